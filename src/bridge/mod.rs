//! The async-to-sync bridge.
//!
//! Mirrors the split of a URL request job in Chromium's `net/url_request/`:
//! - [`request`]: outbound translation to engine parameters
//! - [`response`]: inbound translation of engine metadata
//! - [`redirect`]: follow/cancel policy
//! - [`callback`]: the engine callback adapter
//! - [`pending`]: per-request state and the one-shot completion signal
//! - [`interceptor`]: the blocking entry point

pub mod callback;
pub mod interceptor;
pub mod pending;
pub mod redirect;
pub mod request;
pub mod response;

pub use callback::CallbackAdapter;
pub use interceptor::{Chain, EngineInterceptor, Interceptor};
pub use pending::{Outcome, PendingOperation};
pub use redirect::{RedirectDecision, RedirectPolicy};
