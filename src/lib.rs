//! # enginebridge
//!
//! Serve blocking HTTP calls through a callback-driven network engine.
//!
//! `enginebridge` sits in a synchronous HTTP client's interceptor pipeline.
//! When the process-wide engine is ready, each call is dispatched to it, its
//! lifecycle callbacks are collected into a canonical response, and the
//! calling thread blocks until exactly one terminal outcome arrives. Until
//! then, calls go to the fallback transport unchanged.
//!
//! ## Features
//!
//! - **Transparent transport**: HTTP/2, QUIC and compression handled by the engine
//! - **Exactly-once completion**: one-shot signal per request, first terminal wins
//! - **Redirect policy**: same-scheme and cross-scheme flags, capped at 20 hops
//! - **Header hygiene**: compression negotiation left to the engine
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use enginebridge::bridge::{EngineInterceptor, Interceptor};
//! use enginebridge::engine::EngineSession;
//! use std::sync::Arc;
//!
//! let session = Arc::new(EngineSession::new());
//! session.install(&runtime_handle, install_engine());
//!
//! let interceptor = EngineInterceptor::new(session.clone());
//! let response = interceptor.intercept(&mut chain)?;
//! println!("Status: {} via {}", response.code(), response.protocol());
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error taxonomy, engine error codes, adapter states
//! - [`bridge`] - Translators, redirect policy, callback adapter, interceptor
//! - [`engine`] - Engine interface, configuration, session
//! - [`http`] - Canonical request/response model
//! - [`observer`] - Call lifecycle observers

pub mod base;
pub mod bridge;
pub mod engine;
pub mod http;
pub mod observer;

pub use base::error::BridgeError;
pub use bridge::{EngineInterceptor, Interceptor};
