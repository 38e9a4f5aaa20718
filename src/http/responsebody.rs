//! Fully buffered response body.

use bytes::Bytes;
use std::string::FromUtf8Error;

/// Media type given to bodies whose response carries no `Content-Type`.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=\"utf-8\"";

/// Response body: the complete received bytes and their media type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBody {
    content_type: Option<String>,
    bytes: Bytes,
}

impl ResponseBody {
    pub fn new(bytes: Bytes, content_type: Option<String>) -> Self {
        Self {
            content_type,
            bytes,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the body bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the body bytes.
    pub fn bytes(self) -> Bytes {
        self.bytes
    }

    /// Read body as UTF-8 string.
    pub fn text(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.bytes.to_vec())
    }

    /// Read body as JSON, deserializing to type T.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.bytes)
    }
}
