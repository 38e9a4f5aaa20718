//! Ergonomic error context helpers.
//!
//! Provides an extension trait for adding context to `Result` types,
//! converting IO errors into context-rich `BridgeError` variants.

use crate::base::error::BridgeError;
use std::io;
use url::Url;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Attribute an IO error to serializing the body of a request for `url`.
    ///
    /// # Example
    /// ```ignore
    /// use enginebridge::base::context::IoResultExt;
    ///
    /// body.write_to(&mut buf).body_context(request.url())?;
    /// // Error: "Failed to serialize request body for https://example.com/: broken pipe"
    /// ```
    fn body_context(self, url: &Url) -> Result<T, BridgeError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn body_context(self, url: &Url) -> Result<T, BridgeError> {
        self.map_err(|source| BridgeError::Translation {
            url: url.to_string(),
            source,
        })
    }
}
