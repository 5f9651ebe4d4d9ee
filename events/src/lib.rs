//! Periodic event sources for the broadcast service.
//!
//! This crate produces the events that are pushed to every connected client
//! without any client having asked for them, and decouples their production
//! from delivery.
//!
//! # Architecture
//!
//! - **FeedEvent**: Enum representing every event a background source can emit
//! - **Heartbeat** / **PriceWalk**: The state machines behind each source
//! - **EventHandler**: Trait for implementing event consumers (the SSE hub is one)
//! - **EventPublisher**: Publishes events to registered handlers
//! - **Scheduler**: Drives both sources on their own cadence until cancelled
//!
//! This crate has no dependency on the `sse` crate. Delivery concerns such as
//! serialization, audience size and timestamps are added by the handler.

use async_trait::async_trait;
use std::sync::Arc;

pub mod heartbeat;
pub mod price_walk;
pub mod scheduler;

pub use heartbeat::Heartbeat;
pub use price_walk::{PriceWalk, PriceWalkConfig};
pub use scheduler::Scheduler;

/// Events emitted by the background sources.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Emitted once per heartbeat period.
    Heartbeat {
        /// Monotonic tick number, starting at 1 for the first heartbeat of the process.
        counter: u64,
    },
    /// Emitted once per simulated feed period.
    PriceTick {
        symbol: String,
        /// New price, rounded to cents and never below the configured floor.
        price: f64,
        /// Difference to the previous price, rounded to cents.
        change: f64,
    },
}

/// Trait for handling feed events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &FeedEvent);
}

/// Publishes feed events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher, clones taken earlier do not see the handler.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Publish an event to all registered handlers, one after another.
    pub async fn publish(&self, event: FeedEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Handler that remembers every event it was given.
    #[derive(Default)]
    pub(crate) struct RecordingHandler {
        events: Mutex<Vec<FeedEvent>>,
    }

    impl RecordingHandler {
        pub(crate) fn events(&self) -> Vec<FeedEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &FeedEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
