use crate::connection::{ClientInfo, SubscriberId, SubscriberRegistry};
use crate::error::Error;
use crate::message::{Event, EventType};
use crate::sink::{Frame, Sink};
use futures::future::join_all;
use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default bound on a single subscriber write.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(1000);

/// Returned by [`Hub::subscribe`]; pass it back to [`Hub::unsubscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberHandle {
    id: SubscriberId,
}

impl SubscriberHandle {
    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

/// Lifetime counters of a hub, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
    /// Events serialized into frames (welcome events included).
    pub frames_encoded: u64,
    /// Successful subscriber writes.
    pub delivered: u64,
    /// Subscribers dropped after a failed or timed out write.
    pub dropped: u64,
}

#[derive(Default)]
struct Counters {
    frames_encoded: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

/// Broadcast hub for long-lived streaming connections.
///
/// Guarantees:
/// - A subscriber's first frame is its own `connection` welcome, even if a
///   publish runs concurrently with the subscription.
/// - A publish only reaches the subscribers registered when it started.
/// - A failed or slow write only affects its own subscriber, which is removed
///   from the hub. The publisher never sees the failure.
pub struct Hub {
    registry: Arc<SubscriberRegistry>,
    send_timeout: Duration,
    counters: Counters,
}

impl Hub {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new()),
            send_timeout,
            counters: Counters::default(),
        }
    }

    /// Registers `sink` under a fresh id after sending it a welcome event.
    ///
    /// The welcome goes out before the subscriber is visible to `publish`, so
    /// no broadcast can overtake it. A sink that is already closed is still
    /// registered, and goes away on the first broadcast it fails.
    pub async fn subscribe(&self, sink: Arc<dyn Sink>) -> SubscriberHandle {
        let id = self.registry.next_id();

        match self.encode(&Event::welcome(id)) {
            Ok(frame) => {
                if let Err(e) = self.deliver(sink.as_ref(), frame).await {
                    warn!("Failed to send welcome to subscriber {id}: {e}");
                }
            }
            Err(e) => error!("Failed to serialize welcome for subscriber {id}: {e}"),
        }

        self.registry.insert(id, sink);
        info!(
            "Registered subscriber {id} ({} connected)",
            self.registry.len()
        );

        SubscriberHandle { id }
    }

    /// Removes the subscriber. Unknown or already removed handles are ignored.
    pub fn unsubscribe(&self, handle: &SubscriberHandle) {
        if self.registry.remove(handle.id) {
            info!(
                "Unregistered subscriber {} ({} connected)",
                handle.id,
                self.registry.len()
            );
        }
    }

    /// Sends `event` to every current subscriber and returns how many were
    /// attempted.
    ///
    /// With no subscribers this returns 0 without serializing anything.
    /// Otherwise the event is serialized once and written to all sinks
    /// concurrently; subscribers whose write fails or exceeds the send
    /// timeout are dropped. The return value counts them as attempted.
    pub async fn publish(&self, event: &Event) -> usize {
        let recipients = self.registry.snapshot();
        if recipients.is_empty() {
            trace!("No subscribers, skipping {} event", event.event_type());
            return 0;
        }

        let frame = match self.encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to serialize {} event: {e}", event.event_type());
                return 0;
            }
        };

        let attempted = recipients.len();
        let deliveries = recipients.into_iter().map(|(id, sink)| {
            let frame = frame.clone();
            async move {
                // Unsubscribed since the snapshot was taken.
                if !self.registry.contains(id) {
                    return (id, Ok(()));
                }
                (id, self.deliver(sink.as_ref(), frame).await)
            }
        });

        let mut dropped = 0;
        for (id, result) in join_all(deliveries).await {
            if let Err(e) = result {
                warn!("Dropping subscriber {id}: {e}");
                if self.registry.remove(id) {
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            self.counters
                .dropped
                .fetch_add(dropped as u64, Ordering::Relaxed);
        }
        debug!(
            "Published {} event to {attempted} subscriber(s), dropped {dropped}",
            event.event_type()
        );

        attempted
    }

    /// Number of currently registered subscribers.
    pub fn count(&self) -> usize {
        self.registry.len()
    }

    /// Snapshot of the registered subscribers, ordered by id.
    pub fn clients(&self) -> Vec<ClientInfo> {
        self.registry.clients()
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            frames_encoded: self.counters.frames_encoded.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    fn encode(&self, event: &Event) -> Result<Frame, Error> {
        let frame = Frame::encode(event)?;
        self.counters.frames_encoded.fetch_add(1, Ordering::Relaxed);
        Ok(frame)
    }

    async fn deliver(&self, sink: &dyn Sink, frame: Frame) -> Result<(), Error> {
        tokio::time::timeout(self.send_timeout, sink.deliver(frame)).await??;
        self.counters.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(DEFAULT_SEND_TIMEOUT)
    }
}
