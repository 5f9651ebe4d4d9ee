use crate::hub::Hub;
use crate::message::Event as SseEvent;
use async_trait::async_trait;
use events::{EventHandler, FeedEvent};
use log::*;
use std::sync::Arc;

/// Handles feed events by converting them to SSE events and broadcasting them
/// to every connected subscriber.
///
/// Nothing is built or sent while nobody is connected. The sources keep
/// ticking regardless, so a client that connects later picks up the current
/// counter and price rather than a replay.
pub struct SseFeedEventHandler {
    hub: Arc<Hub>,
}

impl SseFeedEventHandler {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl EventHandler for SseFeedEventHandler {
    async fn handle(&self, event: &FeedEvent) {
        let audience = self.hub.count();
        if audience == 0 {
            trace!("No subscribers, dropping {event:?}");
            return;
        }

        let sse_event = match event {
            FeedEvent::Heartbeat { counter } => {
                info!("Sending auto message #{counter} to {audience} subscriber(s)");
                SseEvent::auto(*counter, audience)
            }
            FeedEvent::PriceTick {
                symbol,
                price,
                change,
            } => SseEvent::stock(symbol.as_str(), *price, *change),
        };

        self.hub.publish(&sse_event).await;
    }
}
