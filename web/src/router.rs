use crate::controller::{client_controller, health_check_controller, message_controller};
use crate::{response, sse_handler, AppState};
use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::services::ServeDir;
use utoipa::OpenApi;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "SSE Broadcast API"
        ),
        paths(
            sse_handler::sse_handler,
            message_controller::send,
            client_controller::index,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                response::SendMessageResponse,
                response::ClientsResponse,
                response::Client,
            )
        ),
        tags(
            (name = "sse_broadcast", description = "Server-Sent Events broadcast demo")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let static_dir = app_state.config.static_dir.clone();

    Router::new()
        .merge(event_stream_routes(app_state.clone()))
        .merge(message_routes(app_state.clone()))
        .merge(client_routes(app_state))
        .merge(health_routes())
        .merge(api_doc_routes())
        .fallback_service(static_routes(&static_dir))
}

fn event_stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(sse_handler::sse_handler))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/send-message", post(message_controller::send))
        .with_state(app_state)
}

fn client_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/clients", get(client_controller::index))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn api_doc_routes() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

// Serves the demo dashboard (`index.html` at `/`) and any other assets.
fn static_routes(static_dir: &str) -> ServeDir {
    ServeDir::new(static_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_state, body_json};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_openapi_document_lists_every_endpoint() {
        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();

        let response = define_routes(app_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(response).await;
        for path in ["/events", "/send-message", "/clients", "/health"] {
            assert!(doc["paths"].get(path).is_some(), "{path} missing from the OpenAPI document");
        }
    }

    #[tokio::test]
    async fn test_unknown_path_falls_through_to_static_files() {
        let request = Request::builder()
            .uri("/definitely-not-a-file.txt")
            .body(Body::empty())
            .unwrap();

        let response = define_routes(app_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_send_message_rejects_get() {
        let request = Request::builder()
            .uri("/send-message")
            .body(Body::empty())
            .unwrap();

        let response = define_routes(app_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
