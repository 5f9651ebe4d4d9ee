use crate::params::message::SendMessageParams;
use crate::response::{SendMessageResponse, MESSAGE_SENT};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use log::*;
use sse::message::Event as SseEvent;

/// POST broadcast a message to every connected client
///
/// The body is optional. Without a usable `message` string a placeholder text
/// is sent, so this endpoint never rejects a request.
#[utoipa::path(
    post,
    path = "/send-message",
    request_body(content = String, description = "Optional JSON object `{\"message\": \"...\"}`", content_type = "application/json"),
    responses(
        (status = 200, description = "Message published", body = SendMessageResponse),
    )
)]
pub async fn send(State(app_state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let message = SendMessageParams::from_body(&body).message_or_default();
    let clients = app_state.hub.count();

    debug!("POST send-message to {clients} client(s): {message}");

    let event = SseEvent::message(message, clients);
    let attempted = app_state.hub.publish(&event).await;

    Json(SendMessageResponse {
        success: true,
        message: MESSAGE_SENT.to_string(),
        client_count: attempted,
    })
}

#[cfg(test)]
mod tests {
    use crate::router::define_routes;
    use crate::test_support::{app_state, body_json, json_request};
    use axum::http::StatusCode;
    use serde_json::json;
    use sse::message::DEFAULT_MESSAGE;
    use sse::{Frame, Hub};
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    async fn subscribe(hub: &Hub) -> mpsc::Receiver<Frame> {
        let (tx, mut rx) = mpsc::channel(8);
        hub.subscribe(Arc::new(tx)).await;
        // discard the welcome
        rx.recv().await.unwrap();
        rx
    }

    fn parse(frame: Frame) -> serde_json::Value {
        serde_json::from_str(frame.data()).unwrap()
    }

    #[tokio::test]
    async fn test_send_message_broadcasts_and_reports_client_count() {
        let state = app_state();
        let hub = state.hub.clone();
        let mut first = subscribe(&hub).await;
        let mut second = subscribe(&hub).await;

        let response = define_routes(state)
            .oneshot(json_request("POST", "/send-message", r#"{"message":"hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "message": "Message sent", "clientCount": 2})
        );

        for rx in [&mut first, &mut second] {
            let value = parse(rx.recv().await.unwrap());
            assert_eq!(value["type"], "message");
            assert_eq!(value["message"], "hello");
            assert_eq!(value["clients"], 2);
        }
    }

    #[tokio::test]
    async fn test_send_message_without_body_uses_default_text() {
        let state = app_state();
        let mut rx = subscribe(&state.hub).await;

        let response = define_routes(state.clone())
            .oneshot(json_request("POST", "/send-message", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(parse(rx.recv().await.unwrap())["message"], DEFAULT_MESSAGE);
    }

    #[tokio::test]
    async fn test_send_message_with_no_clients_succeeds() {
        let response = define_routes(app_state())
            .oneshot(json_request("POST", "/send-message", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["clientCount"], 0);
    }
}
