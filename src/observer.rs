//! Call lifecycle observers.
//!
//! Observers are notified from the engine's worker thread as a request
//! progresses. They cannot influence the request: an observer that returns
//! an error or panics is logged and otherwise ignored, so the adapter's
//! terminal bookkeeping is never disturbed by caller code.

use crate::base::error::BridgeError;
use crate::http::Response;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Error an observer may return from [`CallObserver::on_response`].
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Receives lifecycle events for calls served by the engine.
///
/// Every method has an empty default.
pub trait CallObserver: Send + Sync {
    /// Status line and headers are complete.
    fn response_headers_end(&self, _response: &Response) {}

    /// Body streaming is about to begin.
    fn response_body_start(&self) {}

    /// Body streaming finished.
    fn response_body_end(&self, _received_byte_count: u64) {}

    /// The call ended, successfully or through cancellation.
    fn call_end(&self) {}

    /// The call ended with a transport fault.
    fn call_failed(&self, _error: &BridgeError) {}

    /// Final response delivery.
    fn on_response(&self, _response: &Response) -> Result<(), ObserverError> {
        Ok(())
    }

    /// Final failure delivery.
    fn on_failure(&self, _error: &BridgeError) {}
}

/// The observers attached to one call.
#[derive(Clone, Default)]
pub struct Observers {
    list: Vec<Arc<dyn CallObserver>>,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.list.len())
            .finish()
    }
}

impl Observers {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub fn push(&mut self, observer: Arc<dyn CallObserver>) {
        self.list.push(observer);
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Deliver `event` to every observer, containing panics.
    pub(crate) fn emit<F>(&self, event: &'static str, f: F)
    where
        F: Fn(&dyn CallObserver),
    {
        for observer in &self.list {
            if catch_unwind(AssertUnwindSafe(|| f(observer.as_ref()))).is_err() {
                tracing::error!(event, "call observer panicked");
            }
        }
    }

    /// Deliver the final response; observer errors and panics are logged.
    pub(crate) fn deliver_response(&self, response: &Response) {
        for observer in &self.list {
            match catch_unwind(AssertUnwindSafe(|| observer.on_response(response))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, url = %response.request().url(), "response observer failed");
                }
                Err(_) => {
                    tracing::error!(url = %response.request().url(), "response observer panicked");
                }
            }
        }
    }
}

impl FromIterator<Arc<dyn CallObserver>> for Observers {
    fn from_iter<I: IntoIterator<Item = Arc<dyn CallObserver>>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().collect(),
        }
    }
}
