//! Base types and error handling.
//!
//! - [`BridgeError`](error::BridgeError): errors surfaced to interceptor callers
//! - [`NetError`](neterror::NetError): engine-native error codes from `net_error_list.h`
//! - [`AdapterState`](loadstate::AdapterState): callback adapter lifecycle

pub mod context;
pub mod error;
pub mod loadstate;
pub mod neterror;
