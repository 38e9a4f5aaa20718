//! The asynchronous network engine, as seen by the bridge.
//!
//! The engine owns the wire: TLS, HTTP/2, QUIC, caching and transparent
//! decompression. It reports request progress through a
//! [`UrlRequestCallback`] instead of returning a value, delivering the
//! callbacks for one request sequentially from its own worker threads.
//!
//! - [`Engine`]: creates requests
//! - [`UrlRequest`]: handle to one in-flight request
//! - [`UrlRequestCallback`]: lifecycle events the engine delivers
//! - [`EngineSession`](session::EngineSession): readiness of the process-wide engine
//! - [`EngineConfig`](config::EngineConfig): settings consumed at engine construction

pub mod config;
pub mod session;
pub mod upload;

use crate::base::neterror::NetError;
use crate::http::Headers;
use bytes::BytesMut;
use http::Method;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

pub use config::EngineConfig;
pub use session::{EngineSession, SessionState};
pub use upload::UploadDataProvider;

/// Parameters for dispatching one request to the engine.
#[derive(Debug, Clone)]
pub struct EngineRequestParams {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
    pub upload: Option<UploadDataProvider>,
}

/// Response metadata the engine attaches to each callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlResponseInfo {
    /// URL the response came from; the last entry of `url_chain`.
    pub url: String,
    /// Every URL visited, original first, one entry per redirect hop.
    pub url_chain: Vec<String>,
    pub http_status_code: u16,
    pub http_status_text: String,
    /// Raw headers in wire order. Not validated by the engine.
    pub all_headers: Vec<(String, String)>,
    /// ALPN or similar identifier, e.g. `h2`, `http/1.1`, `quic/1+spdy/3`.
    pub negotiated_protocol: String,
    pub was_cached: bool,
    pub received_byte_count: u64,
}

/// A transport fault reported by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} ({net_error}, code {})", .net_error.as_i32())]
pub struct EngineFault {
    net_error: NetError,
    quic_detailed_error: Option<i32>,
    message: String,
}

impl EngineFault {
    pub fn new(net_error: NetError, message: impl Into<String>) -> Self {
        Self {
            net_error,
            quic_detailed_error: None,
            message: message.into(),
        }
    }

    /// Attach the QUIC-level error detail.
    pub fn with_quic_detail(mut self, code: i32) -> Self {
        self.quic_detailed_error = Some(code);
        self
    }

    pub fn net_error(&self) -> NetError {
        self.net_error
    }

    pub fn quic_detailed_error(&self) -> Option<i32> {
        self.quic_detailed_error
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Handle to one engine request.
///
/// Every method is asynchronous: it returns immediately and the outcome
/// arrives later through the request's [`UrlRequestCallback`].
pub trait UrlRequest: Send + Sync {
    /// Begin the request.
    fn start(&self);

    /// Continue past the redirect most recently reported.
    fn follow_redirect(&self);

    /// Abort; the engine answers with `on_canceled`.
    fn cancel(&self);

    /// Fill `buffer` up to its capacity with body bytes; the filled buffer
    /// comes back through `on_read_completed`.
    fn read(&self, buffer: BytesMut);
}

/// Lifecycle events for one request.
///
/// Exactly one of `on_succeeded`, `on_failed` or `on_canceled` ends a request.
pub trait UrlRequestCallback: Send + Sync {
    fn on_redirect_received(
        &self,
        request: &dyn UrlRequest,
        info: &UrlResponseInfo,
        new_location_url: &str,
    );

    fn on_response_started(&self, request: &dyn UrlRequest, info: &UrlResponseInfo);

    fn on_read_completed(&self, request: &dyn UrlRequest, info: &UrlResponseInfo, buffer: BytesMut);

    fn on_succeeded(&self, request: &dyn UrlRequest, info: &UrlResponseInfo);

    fn on_failed(&self, request: &dyn UrlRequest, info: Option<&UrlResponseInfo>, error: EngineFault);

    fn on_canceled(&self, request: &dyn UrlRequest, info: Option<&UrlResponseInfo>);
}

/// A ready-to-use network engine.
pub trait Engine: Send + Sync {
    /// Create (but do not start) a request delivering events to `callback`.
    fn new_url_request(
        &self,
        params: EngineRequestParams,
        callback: Arc<dyn UrlRequestCallback>,
    ) -> Box<dyn UrlRequest>;
}
