use events::{EventPublisher, PriceWalk, PriceWalkConfig, Scheduler};
use log::*;
use service::{config::Config, logging::Logger};
use sse::{Hub, SseFeedEventHandler};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    info!(
        "Starting up SSE broadcast server ({} environment)",
        config.runtime_env()
    );

    let hub = Arc::new(Hub::new(config.send_timeout()));

    let publisher =
        EventPublisher::new().with_handler(Arc::new(SseFeedEventHandler::new(Arc::clone(&hub))));
    let scheduler = Scheduler::start(
        publisher,
        config.heartbeat_interval(),
        config.feed_interval(),
        PriceWalk::new(price_walk_config(&config)),
    );

    let app_state = web::AppState::new(config, &hub);
    let result = web::init_server(app_state, shutdown_signal()).await;

    scheduler.shutdown().await;

    if let Err(e) = result {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

fn price_walk_config(config: &Config) -> PriceWalkConfig {
    PriceWalkConfig {
        symbol: config.feed_symbol.clone(),
        initial_price: config.feed_initial_price,
        floor: config.feed_price_floor,
        max_step: config.feed_max_step,
    }
}

/// Resolves on Ctrl-C, or on SIGTERM where that exists.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received, closing connections");
}
