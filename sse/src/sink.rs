use crate::error::Error;
use async_trait::async_trait;
use axum::response::sse::Event as AxumEvent;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One serialized event, shared by every subscriber of a single publish.
///
/// Cloning a frame only bumps a reference count, the JSON text is encoded once.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame(Arc<str>);

impl Frame {
    /// Serializes `value` as compact JSON.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, Error> {
        let json = serde_json::to_string(value)?;
        Ok(Self(json.into()))
    }

    /// The JSON payload without any SSE framing.
    pub fn data(&self) -> &str {
        &self.0
    }

}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Frame").field(&&*self.0).finish()
    }
}

// Frames carry no `event:` line so browser clients receive them via `onmessage`.
impl From<Frame> for AxumEvent {
    fn from(frame: Frame) -> Self {
        AxumEvent::default().data(frame.data())
    }
}

/// Write target of one subscriber.
///
/// `deliver` may wait (for buffer space, a socket, ...). The hub bounds every
/// call with its send timeout, so implementations need no deadline of their own.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn deliver(&self, frame: Frame) -> Result<(), Error>;
}

/// The sink handed to the SSE response stream: a bounded channel whose
/// receiver is drained by the HTTP connection.
#[async_trait]
impl Sink for mpsc::Sender<Frame> {
    async fn deliver(&self, frame: Frame) -> Result<(), Error> {
        self.send(frame).await?;
        Ok(())
    }
}
