pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::fitting::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/fonts", get(handlers::handle_list_fonts))
        .route("/api/v1/fit", post(handlers::handle_fit))
        .route("/api/v1/measure", post(handlers::handle_measure))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState {
            config: Config::default(),
        })
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "autofit");
    }

    #[tokio::test]
    async fn test_list_fonts() {
        let request = Request::builder()
            .uri("/api/v1/fonts")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["default"], "inter");
        assert_eq!(body["fonts"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_fit_shrinks_to_width() {
        let (status, body) = post_json(
            "/api/v1/fit",
            json!({
                "text": "Quarterly revenue grew across every region",
                "width": 400.0,
                "height": 100.0,
                "max_size": 40.0,
                "max_lines": 1,
                "direction": "width"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fitted"], true);
        assert_eq!(body["changed"], true);
        assert_eq!(body["line_count"], 1);
        let size = body["size"].as_f64().unwrap();
        assert!(size < 40.0 && size >= 10.0, "size {size}");
    }

    #[tokio::test]
    async fn test_fit_accepts_numeric_direction() {
        let (status, body) = post_json(
            "/api/v1/fit",
            json!({
                "text": "Short",
                "width": 400.0,
                "height": 100.0,
                "max_size": 24.0,
                "max_lines": 2,
                "direction": 2
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["direction"], "both");
        assert_eq!(body["size"], 24.0);
        assert_eq!(body["changed"], false);
    }

    #[tokio::test]
    async fn test_fit_rejects_bad_direction() {
        let (status, body) = post_json(
            "/api/v1/fit",
            json!({
                "text": "Short",
                "width": 400.0,
                "height": 100.0,
                "max_size": 24.0,
                "max_lines": 1,
                "direction": "diagonal"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_fit_rejects_unknown_font() {
        let (status, body) = post_json(
            "/api/v1/fit",
            json!({
                "text": "Short",
                "font": "comic_sans",
                "width": 400.0,
                "height": 100.0,
                "max_size": 24.0,
                "max_lines": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_measure_wraps_and_reports_block_height() {
        let (status, body) = post_json(
            "/api/v1/measure",
            json!({
                "text": "one two three four five six",
                "font": "oswald",
                "size": 20.0,
                "width": 80.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["font"], "oswald");
        let lines = body["line_count"].as_u64().unwrap();
        assert!(lines > 1);
        assert_eq!(body["line_widths"].as_array().map(Vec::len), Some(lines as usize));
        assert!(body["block_height"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_measure_rejects_zero_size() {
        let (status, _) = post_json(
            "/api/v1/measure",
            json!({ "text": "x", "size": 0.0 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
