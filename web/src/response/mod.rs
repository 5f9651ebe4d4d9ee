//! JSON bodies returned by the HTTP API.

use serde::Serialize;
use sse::connection::ClientInfo;
use utoipa::ToSchema;

/// Status text of a successful `POST /send-message`.
pub(crate) const MESSAGE_SENT: &str = "Message sent";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    /// Subscribers the message was published to
    pub(crate) client_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Client {
    pub(crate) id: u64,
    /// ISO-8601 time the stream was opened
    pub(crate) connected_at: String,
}

impl From<ClientInfo> for Client {
    fn from(info: ClientInfo) -> Self {
        Self {
            id: info.id.as_u64(),
            connected_at: info.connected_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientsResponse {
    pub(crate) client_count: usize,
    pub(crate) clients: Vec<Client>,
}

impl From<Vec<ClientInfo>> for ClientsResponse {
    fn from(clients: Vec<ClientInfo>) -> Self {
        Self {
            client_count: clients.len(),
            clients: clients.into_iter().map(Client::from).collect(),
        }
    }
}
