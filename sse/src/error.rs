//! Error types for the `sse` crate.
//!
//! Follows the workspace pattern of a root Error struct holding an error kind
//! and an optional source for error chaining. None of these errors ever reach
//! a publisher: the hub resolves each one locally, usually by dropping the
//! subscriber the error belongs to.

use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The subscriber's transport has gone away.
    SinkClosed,
    /// The write did not complete within the hub's send timeout.
    Timeout,
    /// The event could not be serialized into a frame.
    Encode,
}

impl Error {
    pub fn sink_closed() -> Self {
        Self {
            source: None,
            error_kind: ErrorKind::SinkClosed,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.error_kind {
            ErrorKind::SinkClosed => write!(f, "subscriber sink is closed"),
            ErrorKind::Timeout => write!(f, "subscriber write timed out"),
            ErrorKind::Encode => match &self.source {
                Some(source) => write!(f, "failed to encode event: {source}"),
                None => write!(f, "failed to encode event"),
            },
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Encode,
        }
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for Error {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Error::sink_closed()
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Timeout,
        }
    }
}
