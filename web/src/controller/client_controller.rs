use crate::response::ClientsResponse;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

/// GET the currently connected clients
#[utoipa::path(
    get,
    path = "/clients",
    responses(
        (status = 200, description = "Snapshot of the connected clients", body = ClientsResponse),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(ClientsResponse::from(app_state.hub.clients()))
}
