use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Controllers are built per request inside the blocking pool; nothing mutable is shared.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
