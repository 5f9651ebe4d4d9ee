use crate::sink::Sink;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for a subscriber (server-generated, starts at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SubscriberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered subscriber
pub struct Subscriber {
    pub sink: Arc<dyn Sink>,
    pub connected_at: DateTime<Utc>,
}

/// Public view of a subscriber, as listed by `GET /clients`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub id: SubscriberId,
    pub connected_at: String,
}

/// The live subscriber set.
///
/// Every read and write goes through one mutex so that a snapshot taken for a
/// publish is consistent with concurrent subscribes and unsubscribes. The lock
/// is only ever held for map operations, never across an await point.
pub struct SubscriberRegistry {
    subscribers: Mutex<BTreeMap<SubscriberId, Subscriber>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Mints a fresh id without registering anything under it.
    pub fn next_id(&self) -> SubscriberId {
        SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub fn insert(&self, id: SubscriberId, sink: Arc<dyn Sink>) {
        self.subscribers.lock().insert(
            id,
            Subscriber {
                sink,
                connected_at: Utc::now(),
            },
        );
    }

    /// Removes a subscriber, returning whether it was still present.
    /// Removing an absent id is a no-op.
    pub fn remove(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().remove(&id).is_some()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sinks of every current subscriber, in id order.
    pub fn snapshot(&self) -> Vec<(SubscriberId, Arc<dyn Sink>)> {
        self.subscribers
            .lock()
            .iter()
            .map(|(id, subscriber)| (*id, Arc::clone(&subscriber.sink)))
            .collect()
    }

    pub fn clients(&self) -> Vec<ClientInfo> {
        self.subscribers
            .lock()
            .iter()
            .map(|(id, subscriber)| ClientInfo {
                id: *id,
                connected_at: subscriber
                    .connected_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            })
            .collect()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
