//! Error taxonomy surfaced to callers of the bridge.

use crate::engine::EngineFault;
use std::io;
use thiserror::Error;

/// Everything [`Interceptor::intercept`](crate::bridge::interceptor::Interceptor::intercept)
/// can fail with.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The outbound request could not be turned into engine parameters.
    /// Raised before the engine sees the request.
    #[error("Failed to serialize request body for {url}: {source}")]
    Translation {
        url: String,
        #[source]
        source: io::Error,
    },

    /// The engine reported a transport fault through its failed callback.
    #[error("Engine request failed: {0}")]
    Engine(#[source] EngineFault),

    /// The engine request ended through cancellation. Not a transport fault:
    /// no response was produced and nothing went wrong on the wire.
    #[error("Request canceled")]
    Canceled,

    /// The engine dropped the request without delivering any terminal callback.
    #[error("Engine released the request without a terminal callback")]
    Abandoned,

    /// The fallback transport failed.
    #[error(transparent)]
    Fallback(#[from] io::Error),
}

impl BridgeError {
    /// True for the cancel-without-error terminal outcome.
    pub fn is_canceled(&self) -> bool {
        matches!(self, BridgeError::Canceled)
    }

    /// The engine fault, if this error came from the engine.
    pub fn engine_fault(&self) -> Option<&EngineFault> {
        match self {
            BridgeError::Engine(fault) => Some(fault),
            _ => None,
        }
    }

    /// Convert into an `io::Error`, for callers whose pipeline speaks `io` only.
    pub fn into_io(self) -> io::Error {
        match self {
            BridgeError::Fallback(e) => e,
            BridgeError::Translation { source, .. } => source,
            BridgeError::Canceled => io::Error::new(io::ErrorKind::Interrupted, self),
            other => io::Error::other(other),
        }
    }
}
