//! Canonical HTTP data model shared by the interceptor pipeline.

pub mod headers;
pub mod protocol;
pub mod request;
pub mod requestbody;
pub mod response;
pub mod responsebody;

// Re-exports for convenience
pub use headers::{Headers, InvalidHeader};
pub use protocol::Protocol;
pub use request::{Request, RequestBuilder};
pub use requestbody::{BodyWriter, RequestBody};
pub use response::{Response, ResponseBuilder};
pub use responsebody::ResponseBody;
