//! Per-request pending state and the one-shot completion signal.
//!
//! The engine side ([`OperationState`]) accumulates the body, counts
//! redirects and records the terminal outcome exactly once. The caller side
//! ([`PendingOperation`]) blocks until that outcome is released.

use crate::base::error::BridgeError;
use crate::base::loadstate::AdapterState;
use crate::bridge::response::PartialResponse;
use crate::http::Response;
use bytes::{Bytes, BytesMut};
use tokio::sync::oneshot;

/// The single final result of one dispatched request.
#[derive(Debug)]
pub enum Outcome {
    Response(Response),
    Failed(BridgeError),
    /// Ended through cancellation; no response and no transport fault.
    Canceled,
}

impl Outcome {
    fn state(&self) -> AdapterState {
        match self {
            Outcome::Response(_) => AdapterState::Succeeded,
            Outcome::Failed(_) => AdapterState::Failed,
            Outcome::Canceled => AdapterState::Canceled,
        }
    }

    /// Collapse into the interceptor's result shape.
    pub fn into_result(self) -> Result<Response, BridgeError> {
        match self {
            Outcome::Response(response) => Ok(response),
            Outcome::Failed(error) => Err(error),
            Outcome::Canceled => Err(BridgeError::Canceled),
        }
    }
}

/// Engine-side state of one request. Touched only by the sequential stream
/// of engine callbacks.
#[derive(Debug)]
pub(crate) struct OperationState {
    pub(crate) state: AdapterState,
    pub(crate) follow_count: u32,
    pub(crate) partial: Option<PartialResponse>,
    body: BytesMut,
    signal: Option<oneshot::Sender<Outcome>>,
}

impl OperationState {
    /// Count one more redirect and return the new total.
    pub(crate) fn record_redirect(&mut self) -> u32 {
        self.follow_count = self.follow_count.saturating_add(1);
        self.follow_count
    }

    /// Append a body chunk in delivery order.
    pub(crate) fn append_chunk(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
        self.state = AdapterState::Reading;
    }

    /// Take everything received so far.
    pub(crate) fn take_body(&mut self) -> Bytes {
        self.body.split().freeze()
    }

    /// Record the terminal outcome and release the waiter.
    ///
    /// Only the first call has any effect; it returns `false` for every later
    /// one and the later outcome is dropped.
    pub(crate) fn complete(&mut self, outcome: Outcome) -> bool {
        if self.state.is_terminal() {
            tracing::error!(
                recorded = ?self.state,
                rejected = ?outcome.state(),
                "duplicate terminal callback ignored"
            );
            return false;
        }
        self.state = outcome.state();
        match self.signal.take() {
            Some(tx) => {
                if tx.send(outcome).is_err() {
                    tracing::debug!("request outcome dropped, caller stopped waiting");
                }
            }
            None => tracing::error!("completion signal already released"),
        }
        true
    }
}

/// Caller-side handle to one dispatched request.
#[derive(Debug)]
pub struct PendingOperation {
    receiver: oneshot::Receiver<Outcome>,
}

/// Create linked engine-side state and caller-side handle.
pub(crate) fn pending() -> (OperationState, PendingOperation) {
    let (tx, rx) = oneshot::channel();
    let state = OperationState {
        state: AdapterState::Created,
        follow_count: 0,
        partial: None,
        body: BytesMut::new(),
        signal: Some(tx),
    };
    (state, PendingOperation { receiver: rx })
}

impl PendingOperation {
    /// Block until the request reaches its terminal outcome.
    ///
    /// # Panics
    ///
    /// Panics when called from inside an asynchronous execution context;
    /// the wait parks the calling thread.
    pub fn wait_for_outcome(self) -> Outcome {
        match self.receiver.blocking_recv() {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!("engine released request without terminal callback");
                Outcome::Failed(BridgeError::Abandoned)
            }
        }
    }

    /// Block until the request completes and return its response.
    ///
    /// Cancellation surfaces as [`BridgeError::Canceled`].
    pub fn wait_for_completion(self) -> Result<Response, BridgeError> {
        self.wait_for_outcome().into_result()
    }
}
