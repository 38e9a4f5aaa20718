//! Synchronous interceptor entry point.
//!
//! Serves each call through the engine when the session is ready, otherwise
//! hands the request unchanged to the next transport in the chain.

use crate::base::error::BridgeError;
use crate::bridge::callback::CallbackAdapter;
use crate::bridge::redirect::RedirectPolicy;
use crate::bridge::request::translate;
use crate::engine::{Engine, EngineSession, UrlRequestCallback};
use crate::http::{Request, Response};
use crate::observer::{CallObserver, Observers};
use std::io;
use std::sync::Arc;

/// The rest of the interceptor pipeline.
pub trait Chain {
    /// The request being intercepted.
    fn request(&self) -> &Request;

    /// Run `request` through the remaining pipeline and its transport.
    fn proceed(&mut self, request: Request) -> io::Result<Response>;
}

/// A blocking interceptor in an HTTP client pipeline.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, chain: &mut dyn Chain) -> Result<Response, BridgeError>;
}

/// Interceptor that serves calls through the network engine.
#[derive(Debug, Clone)]
pub struct EngineInterceptor {
    session: Arc<EngineSession>,
    policy: RedirectPolicy,
    observers: Observers,
}

impl EngineInterceptor {
    pub fn new(session: Arc<EngineSession>) -> Self {
        Self {
            session,
            policy: RedirectPolicy::default(),
            observers: Observers::new(),
        }
    }

    /// Use the client's redirect flags.
    pub fn redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a lifecycle observer to every call.
    pub fn observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn session(&self) -> &Arc<EngineSession> {
        &self.session
    }

    /// Serve `request` through `engine`, blocking until it completes.
    ///
    /// # Panics
    ///
    /// Panics when called from inside an asynchronous execution context.
    pub fn execute(&self, engine: &dyn Engine, request: &Request) -> Result<Response, BridgeError> {
        let params = translate(request)?;
        let (adapter, pending) =
            CallbackAdapter::new(request.clone(), self.policy, self.observers.clone());

        let callback: Arc<dyn UrlRequestCallback> = adapter.clone();
        let url_request = engine.new_url_request(params, callback);
        adapter.mark_started();
        // The engine holds the only remaining reference, so a request it drops
        // without a terminal callback surfaces as `Abandoned`.
        drop(adapter);
        url_request.start();

        let result = pending.wait_for_completion();
        drop(url_request);
        result
    }
}

impl Interceptor for EngineInterceptor {
    fn intercept(&self, chain: &mut dyn Chain) -> Result<Response, BridgeError> {
        match self.session.engine() {
            Some(engine) => {
                let request = chain.request().clone();
                tracing::debug!(method = %request.method(), url = %request.url(), "serving request through engine");
                self.execute(engine.as_ref(), &request)
            }
            None => {
                let request = chain.request().clone();
                tracing::debug!(
                    state = ?self.session.state(),
                    url = %request.url(),
                    "engine not ready, using fallback transport"
                );
                Ok(chain.proceed(request)?)
            }
        }
    }
}
