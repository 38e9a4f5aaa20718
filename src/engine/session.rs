//! Readiness of the process-wide engine.
//!
//! The engine is installed asynchronously; until that finishes the bridge
//! routes every request through its fallback transport. The session is an
//! explicit object injected into the bridge, so readiness is always queried.

use crate::engine::Engine;
use futures::FutureExt;
use std::future::Future;
use std::io;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
}

/// Why installing the engine failed.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Engine provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("Engine storage setup failed: {0}")]
    Storage(#[from] io::Error),
}

enum Slot {
    Uninitialized,
    Initializing,
    Ready(Arc<dyn Engine>),
}

/// Holds the engine handle once installation succeeds.
pub struct EngineSession {
    slot: RwLock<Slot>,
}

impl Default for EngineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EngineSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineSession")
            .field("state", &self.state())
            .finish()
    }
}

impl EngineSession {
    /// A session with no engine yet.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    /// A session that is ready from the start.
    pub fn with_engine(engine: Arc<dyn Engine>) -> Self {
        Self {
            slot: RwLock::new(Slot::Ready(engine)),
        }
    }

    pub fn state(&self) -> SessionState {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Uninitialized => SessionState::Uninitialized,
            Slot::Initializing => SessionState::Initializing,
            Slot::Ready(_) => SessionState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// The engine, if installation has completed.
    pub fn engine(&self) -> Option<Arc<dyn Engine>> {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Ready(engine) => Some(Arc::clone(engine)),
            _ => None,
        }
    }

    /// Run `installer` on `runtime` and publish its engine when it succeeds.
    ///
    /// Only the first call from `Uninitialized` starts an installation; later
    /// calls return `None`. A failed or panicking installer puts the session
    /// back to `Uninitialized` so installation can be retried.
    pub fn install<F>(self: &Arc<Self>, runtime: &Handle, installer: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = Result<Arc<dyn Engine>, InstallError>> + Send + 'static,
    {
        {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            if !matches!(*slot, Slot::Uninitialized) {
                tracing::debug!("engine installation already started");
                return None;
            }
            *slot = Slot::Initializing;
        }

        let session = Arc::clone(self);
        Some(runtime.spawn(async move {
            let result = AssertUnwindSafe(installer).catch_unwind().await;
            let mut slot = session.slot.write().unwrap_or_else(PoisonError::into_inner);
            match result {
                Ok(Ok(engine)) => {
                    tracing::info!("network engine ready");
                    *slot = Slot::Ready(engine);
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "network engine installation failed");
                    *slot = Slot::Uninitialized;
                }
                Err(_) => {
                    tracing::error!("network engine installer panicked");
                    *slot = Slot::Uninitialized;
                }
            }
        }))
    }
}
