use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

async fn handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn routes() -> Router {
    Router::new().route("/health", get(handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = routes().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "status": "ok" }));
    }
}
