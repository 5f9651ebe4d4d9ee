use std::error::Error as StdError;
use std::fmt;
use std::net::AddrParseError;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors that stop the HTTP server from starting or keep it from running.
/// Request handlers never fail: bad input falls back to defaults.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The configured interface is not an IP address.
    InvalidAddress,
    /// Binding the listener or serving connections failed.
    Io,
}

impl Error {
    pub(crate) fn invalid_address(interface: &str, err: AddrParseError) -> Self {
        Error {
            source: Some(format!("{interface:?}: {err}").into()),
            error_kind: ErrorKind::InvalidAddress,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Web Error ({:?}): {source}", self.error_kind),
            None => write!(f, "Web Error ({:?})", self.error_kind),
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

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Io,
        }
    }
}
