use axum::http::{HeaderValue, Method};
use log::*;
use service::config::Config;
use sse::Hub;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub use error::{Error, ErrorKind, Result};

mod controller;
mod error;
mod params;
mod response;
pub(crate) mod router;
mod sse_handler;

// Router state: configuration, the broadcast hub shared by every handler and
// the token that ends open event streams on shutdown. Lives here rather than in
// `service` since both the hub and the stream token only matter to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hub: Arc<Hub>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(app_config: Config, hub: &Arc<Hub>) -> Self {
        Self {
            config: app_config,
            hub: Arc::clone(hub),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Binds the configured interface and port and serves until `shutdown` resolves.
///
/// Event streams never finish by themselves, so once `shutdown` resolves the
/// state's token is cancelled to end them and let the graceful shutdown complete.
pub async fn init_server<F>(app_state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let streams = app_state.shutdown.clone();
    let shutdown = async move {
        shutdown.await;
        streams.cancel();
    };

    let addr = listen_addr(&app_state.config)?;
    let cors_layer = cors_layer(&app_state.config);

    let listener = TcpListener::bind(addr).await?;
    info!("Server starting... listening for connections on http://{addr}");
    info!("SSE endpoint: http://{addr}/events");

    let app = router::define_routes(app_state).layer(cors_layer);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

fn listen_addr(config: &Config) -> Result<SocketAddr> {
    let ip: IpAddr = config
        .interface()
        .parse()
        .map_err(|e| Error::invalid_address(config.interface(), e))?;
    Ok(SocketAddr::new(ip, config.port))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin}: {e}");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_uses_interface_and_port() {
        let mut config = Config::default();
        config.interface = Some("0.0.0.0".to_string());
        config.port = 8080;

        assert_eq!(
            listen_addr(&config).unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_listen_addr_rejects_hostnames() {
        let mut config = Config::default();
        config.interface = Some("not an ip".to_string());

        let err = listen_addr(&config).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::InvalidAddress);
    }
}
