//! Server-Sent Events (SSE) broadcast hub.
//!
//! This crate owns the set of open event-stream connections and fans events
//! out to all of them.
//!
//! # Architecture
//!
//! - **One lock, one set**: Subscribers live in a single mutex-guarded map.
//!   Subscribe, unsubscribe, implicit drops and the snapshot taken by each
//!   publish are serialized through it.
//! - **Serialize once**: A publish encodes its event into one shared `Frame`
//!   and hands clones of it to every sink. Only the per-subscriber welcome
//!   event is encoded per recipient.
//! - **Failure isolation**: Each write is bounded by the hub's send timeout.
//!   A subscriber whose write fails or times out is dropped, the others are
//!   unaffected and the publisher is never told.
//! - **Ephemeral events**: Nothing is stored. A client that reconnects starts
//!   from the current heartbeat counter and price.
//!
//! # Message Flow
//!
//! 1. Client opens `GET /events`
//! 2. The web layer creates a bounded channel and calls `Hub::subscribe`
//!    with its sender; the welcome event is written first
//! 3. The heartbeat and simulated feed (see the `events` crate) tick and reach
//!    `SseFeedEventHandler`, which publishes when anybody is listening
//! 4. `POST /send-message` publishes a `message` event directly
//! 5. When the HTTP stream is dropped the web layer calls `Hub::unsubscribe`
//!
//! # Example: Publishing an event
//!
//! ```rust,ignore
//! use sse::message::Event as SseEvent;
//!
//! let attempted = app_state.hub.publish(&SseEvent::message("hello", app_state.hub.count())).await;
//! ```
//!
//! # Modules
//!
//! - `connection`: SubscriberRegistry and the type-safe SubscriberId
//! - `hub`: Subscribe / unsubscribe / publish operations
//! - `sink`: The Sink write abstraction and the shared wire Frame
//! - `message`: Typed event definitions
//! - `feed_event_handler`: Bridge from background sources to the hub
//! - `error`: Delivery and encoding errors

pub mod connection;
pub mod error;
pub mod feed_event_handler;
pub mod hub;
pub mod message;
pub mod sink;

pub use feed_event_handler::SseFeedEventHandler;
pub use hub::{Hub, HubStats, SubscriberHandle};
pub use sink::{Frame, Sink};
