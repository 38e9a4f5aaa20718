//! Request body for POST/PUT operations.

use bytes::Bytes;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// A body that serializes itself on demand.
///
/// Implemented by callers whose bodies are produced rather than held
/// (e.g. form encoders). Writing may fail; the failure surfaces as a
/// translation error before the request is dispatched.
pub trait BodyWriter: Send + Sync {
    fn write_to(&self, sink: &mut dyn Write) -> io::Result<()>;

    /// Length in bytes if known up front.
    fn content_length(&self) -> Option<u64> {
        None
    }
}

#[derive(Clone, Default)]
enum Content {
    #[default]
    Empty,
    Bytes(Bytes),
    Writer(Arc<dyn BodyWriter>),
}

/// Request body: a byte source plus an optional declared content type.
#[derive(Clone, Default)]
pub struct RequestBody {
    content_type: Option<String>,
    content: Content,
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = match &self.content {
            Content::Empty => "empty".to_string(),
            Content::Bytes(b) => format!("{} bytes", b.len()),
            Content::Writer(_) => "writer".to_string(),
        };
        f.debug_struct("RequestBody")
            .field("content_type", &self.content_type)
            .field("content", &content)
            .finish()
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::bytes(Bytes::from(s))
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(v: Vec<u8>) -> Self {
        RequestBody::bytes(Bytes::from(v))
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        RequestBody::bytes(Bytes::from(s.to_owned()))
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        RequestBody::bytes(b)
    }
}

impl RequestBody {
    /// Body holding raw bytes, no declared content type.
    pub fn bytes(b: Bytes) -> Self {
        Self {
            content_type: None,
            content: Content::Bytes(b),
        }
    }

    /// Body produced by a [`BodyWriter`] at dispatch time.
    pub fn writer<W: BodyWriter + 'static>(writer: W) -> Self {
        Self {
            content_type: None,
            content: Content::Writer(Arc::new(writer)),
        }
    }

    /// Declare the media type of this body.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Length in bytes, when known without serializing.
    pub fn content_length(&self) -> Option<u64> {
        match &self.content {
            Content::Empty => Some(0),
            Content::Bytes(b) => Some(b.len() as u64),
            Content::Writer(w) => w.content_length(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content_length() == Some(0)
    }

    /// Write the whole body into `sink`.
    pub fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        match &self.content {
            Content::Empty => Ok(()),
            Content::Bytes(b) => sink.write_all(b),
            Content::Writer(w) => w.write_to(sink),
        }
    }
}
