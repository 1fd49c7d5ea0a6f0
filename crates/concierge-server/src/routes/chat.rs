use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use concierge::providers::base::{ByteStream, ChatRequest};
use futures::TryStreamExt;

const ANONYMOUS_USER: &str = "anonymous";

/// Relays the backend's event stream to the browser untouched
pub struct EventStreamResponse {
    stream: ByteStream,
}

impl IntoResponse for EventStreamResponse {
    fn into_response(self) -> Response {
        let stream = self
            .stream
            .inspect_err(|e| tracing::warn!(error = %e, "Backend stream broke off"));

        (
            [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache"),
                (header::CONNECTION, "keep-alive"),
            ],
            Body::from_stream(stream),
        )
            .into_response()
    }
}

async fn handler(
    State(state): State<AppState>,
    Json(mut request): Json<ChatRequest>,
) -> Result<EventStreamResponse, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    if request.user.trim().is_empty() {
        request.user = ANONYMOUS_USER.to_string();
    }
    // An empty id starts a new conversation, same as none
    request.conversation_id = request.conversation_id.filter(|id| !id.is_empty());

    tracing::info!(
        conversation_id = ?request.conversation_id,
        "Relaying chat message"
    );
    let stream = state.backend.stream_chat(&request).await?;
    Ok(EventStreamResponse { stream })
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use concierge::providers::configs::DifyProviderConfig;
    use concierge::providers::dify::DifyProvider;
    use http_body_util::BodyExt;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STREAM_BODY: &str = concat!(
        "data: {\"event\": \"agent_message\", \"answer\": \"Hello\", \"conversation_id\": \"c1\"}\n\n",
        "data: {\"event\": \"message_end\", \"conversation_id\": \"c1\"}\n\n",
    );

    fn app(server: &MockServer) -> Router {
        let backend =
            DifyProvider::new(DifyProviderConfig::new(server.uri(), "app-test")).unwrap();
        routes(AppState::for_backend(Arc::new(backend)))
    }

    fn chat_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .uri("/api/chat")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_relays_event_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat-messages"))
            .and(body_json(json!({
                "inputs": {},
                "query": "Hi",
                "response_mode": "streaming",
                "conversation_id": "c1",
                "user": "visitor-1",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(STREAM_BODY, "text/event-stream"))
            .expect(1)
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(chat_request(json!({
                "query": "Hi",
                "conversation_id": "c1",
                "user": "visitor-1",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/event-stream"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, STREAM_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_user_is_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({
                "inputs": {},
                "query": "Hi",
                "response_mode": "streaming",
                "conversation_id": "",
                "user": "anonymous",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw("", "text/event-stream"))
            .expect(1)
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(chat_request(json!({ "query": "Hi", "conversation_id": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stale_conversation_is_404() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(chat_request(json!({ "query": "Hi", "conversation_id": "gone" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backend_failure_is_502() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(chat_request(json!({ "query": "Hi" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(chat_request(json!({ "query": "   " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
