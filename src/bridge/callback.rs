//! Callback adapter: turns engine lifecycle events into one terminal outcome.
//!
//! Engine calls (`read`, `follow_redirect`, `cancel`) and observer
//! notifications are made with the state lock released, so an engine that
//! delivers the next callback synchronously from inside `read` cannot
//! deadlock the adapter.

use crate::base::error::BridgeError;
use crate::base::loadstate::AdapterState;
use crate::bridge::pending::{pending, OperationState, Outcome, PendingOperation};
use crate::bridge::redirect::{RedirectDecision, RedirectPolicy, MAX_FOLLOW_COUNT};
use crate::bridge::response::{translate as translate_response, PartialResponse};
use crate::engine::{EngineFault, UrlRequest, UrlRequestCallback, UrlResponseInfo};
use crate::http::responsebody::DEFAULT_CONTENT_TYPE;
use crate::http::{Request, Response, ResponseBody};
use crate::observer::Observers;
use bytes::BytesMut;
use http::header::CONTENT_TYPE;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;
use url::Url;

/// Size of each body read issued to the engine.
pub const READ_BUFFER_SIZE: usize = 32 * 1024;

/// Engine callback target for one request.
pub struct CallbackAdapter {
    original: Request,
    policy: RedirectPolicy,
    observers: Observers,
    sent_at: OffsetDateTime,
    op: Mutex<OperationState>,
}

impl std::fmt::Debug for CallbackAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackAdapter")
            .field("url", &self.original.url().as_str())
            .field("state", &self.state())
            .finish()
    }
}

impl CallbackAdapter {
    /// Create the adapter for `original` and the handle its caller waits on.
    pub fn new(
        original: Request,
        policy: RedirectPolicy,
        observers: Observers,
    ) -> (Arc<Self>, PendingOperation) {
        let (op, pending) = pending();
        let adapter = Arc::new(Self {
            original,
            policy,
            observers,
            sent_at: OffsetDateTime::now_utc(),
            op: Mutex::new(op),
        });
        (adapter, pending)
    }

    pub fn state(&self) -> AdapterState {
        self.lock().state
    }

    /// Redirects seen so far.
    pub fn follow_count(&self) -> u32 {
        self.lock().follow_count
    }

    /// Record that the engine request has been started.
    pub fn mark_started(&self) {
        let mut op = self.lock();
        if op.state == AdapterState::Created {
            op.state = AdapterState::Started;
        }
    }

    fn lock(&self) -> MutexGuard<'_, OperationState> {
        self.op.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state unless a terminal outcome is already recorded.
    fn lock_live(&self, event: &'static str) -> Option<MutexGuard<'_, OperationState>> {
        let op = self.lock();
        if op.state.is_terminal() {
            tracing::error!(event, state = ?op.state, url = %self.original.url(), "callback after terminal outcome ignored");
            return None;
        }
        Some(op)
    }

    fn finish(&self, outcome: Outcome) -> bool {
        self.lock().complete(outcome)
    }

    /// Effective request: the original with the engine's final URL.
    fn effective_request(&self, final_url: &str) -> Request {
        if final_url == self.original.url().as_str() {
            return self.original.clone();
        }
        match Url::parse(final_url) {
            Ok(url) => self.original.to_builder().url(url).build(),
            Err(e) => {
                tracing::warn!(url = final_url, error = %e, "engine reported unparseable final url");
                self.original.clone()
            }
        }
    }
}

impl UrlRequestCallback for CallbackAdapter {
    fn on_redirect_received(
        &self,
        request: &dyn UrlRequest,
        _info: &UrlResponseInfo,
        new_location_url: &str,
    ) {
        let Some(mut op) = self.lock_live("redirect_received") else {
            return;
        };
        let count = op.record_redirect();
        drop(op);

        if count > MAX_FOLLOW_COUNT {
            tracing::debug!(count, location = new_location_url, "redirect limit exceeded, canceling");
            request.cancel();
            return;
        }

        match self.policy.decide_for(self.original.url(), new_location_url) {
            RedirectDecision::Follow => {
                tracing::debug!(count, location = new_location_url, "following redirect");
                request.follow_redirect();
            }
            RedirectDecision::Cancel => {
                tracing::debug!(location = new_location_url, "redirect disallowed by policy, canceling");
                request.cancel();
            }
        }
    }

    fn on_response_started(&self, request: &dyn UrlRequest, info: &UrlResponseInfo) {
        let partial = translate_response(info);
        let headers_view = (!self.observers.is_empty())
            .then(|| partial.to_builder(self.original.clone(), self.sent_at).build());

        let Some(mut op) = self.lock_live("response_started") else {
            return;
        };
        op.partial = Some(partial);
        op.state = AdapterState::ResponseStarted;
        drop(op);

        if let Some(view) = headers_view {
            self.observers
                .emit("response_headers_end", |o| o.response_headers_end(&view));
            self.observers
                .emit("response_body_start", |o| o.response_body_start());
        }
        request.read(BytesMut::with_capacity(READ_BUFFER_SIZE));
    }

    fn on_read_completed(
        &self,
        request: &dyn UrlRequest,
        _info: &UrlResponseInfo,
        mut buffer: BytesMut,
    ) {
        let Some(mut op) = self.lock_live("read_completed") else {
            return;
        };
        op.append_chunk(&buffer);
        drop(op);

        buffer.clear();
        request.read(buffer);
    }

    fn on_succeeded(&self, _request: &dyn UrlRequest, info: &UrlResponseInfo) {
        let Some(mut op) = self.lock_live("succeeded") else {
            return;
        };
        let body = op.take_body();
        let partial = op.partial.take();
        drop(op);

        self.observers.emit("response_body_end", |o| {
            o.response_body_end(info.received_byte_count)
        });

        let partial: PartialResponse = partial.unwrap_or_else(|| {
            tracing::warn!(url = %info.url, "success without response start, using final metadata");
            translate_response(info)
        });
        let content_type = partial
            .headers
            .get(CONTENT_TYPE.as_str())
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let response = partial
            .to_builder(self.effective_request(&info.url), self.sent_at)
            .body(ResponseBody::new(body, Some(content_type)))
            .url_chain(info.url_chain.clone())
            .received_at(OffsetDateTime::now_utc())
            .received_byte_count(info.received_byte_count)
            .build();

        tracing::debug!(
            url = %response.request().url(),
            code = response.code(),
            protocol = %response.protocol(),
            body_len = response.body().len(),
            "engine request succeeded"
        );

        let delivered: Option<Response> = (!self.observers.is_empty()).then(|| response.clone());
        if !self.finish(Outcome::Response(response)) {
            return;
        }
        if let Some(delivered) = delivered {
            self.observers.emit("call_end", |o| o.call_end());
            self.observers.deliver_response(&delivered);
        }
    }

    fn on_failed(&self, _request: &dyn UrlRequest, _info: Option<&UrlResponseInfo>, error: EngineFault) {
        tracing::debug!(url = %self.original.url(), error = %error, "engine request failed");
        let for_observers = (!self.observers.is_empty()).then(|| BridgeError::Engine(error.clone()));
        if !self.finish(Outcome::Failed(BridgeError::Engine(error))) {
            return;
        }
        if let Some(err) = for_observers {
            self.observers.emit("call_failed", |o| o.call_failed(&err));
            self.observers.emit("on_failure", |o| o.on_failure(&err));
        }
    }

    fn on_canceled(&self, _request: &dyn UrlRequest, _info: Option<&UrlResponseInfo>) {
        tracing::debug!(url = %self.original.url(), "engine request canceled");
        if !self.finish(Outcome::Canceled) {
            return;
        }
        self.observers.emit("call_end", |o| o.call_end());
    }
}
