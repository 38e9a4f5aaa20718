//! Canonical HTTP response handed back to interceptor callers.

use crate::http::headers::Headers;
use crate::http::protocol::Protocol;
use crate::http::request::Request;
use crate::http::ResponseBody;
use http::StatusCode;
use time::OffsetDateTime;

/// HTTP response with a fully buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    code: u16,
    message: String,
    protocol: Protocol,
    headers: Headers,
    body: ResponseBody,
    request: Request,
    url_chain: Vec<String>,
    sent_at: OffsetDateTime,
    received_at: OffsetDateTime,
    received_byte_count: u64,
}

impl Response {
    /// Start building a response to `request`.
    pub fn builder(request: Request) -> ResponseBuilder {
        let now = OffsetDateTime::now_utc();
        ResponseBuilder {
            inner: Response {
                code: 0,
                message: String::new(),
                protocol: Protocol::Http10,
                headers: Headers::new(),
                body: ResponseBody::default(),
                request,
                url_chain: Vec::new(),
                sent_at: now,
                received_at: now,
                received_byte_count: 0,
            },
        }
    }

    /// The raw status code as reported by the transport.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The status code, if it is a valid HTTP status.
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.code).ok()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Reason phrase from the status line.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_str(name)
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Take the response body for consumption.
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// The request that produced this response. After redirects its URL is
    /// the final location.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Every URL the transport visited, starting with the original and
    /// ending with the final location. Empty when the transport reports none.
    pub fn url_chain(&self) -> &[String] {
        &self.url_chain
    }

    pub fn sent_at(&self) -> OffsetDateTime {
        self.sent_at
    }

    pub fn received_at(&self) -> OffsetDateTime {
        self.received_at
    }

    /// Bytes received on the wire, as counted by the transport.
    pub fn received_byte_count(&self) -> u64 {
        self.received_byte_count
    }

    pub fn to_builder(&self) -> ResponseBuilder {
        ResponseBuilder {
            inner: self.clone(),
        }
    }
}

/// Builder for [`Response`].
#[derive(Debug)]
pub struct ResponseBuilder {
    inner: Response,
}

impl ResponseBuilder {
    pub fn code(mut self, code: u16) -> Self {
        self.inner.code = code;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.inner.message = message.into();
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.inner.protocol = protocol;
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.inner.headers = headers;
        self
    }

    pub fn body(mut self, body: ResponseBody) -> Self {
        self.inner.body = body;
        self
    }

    pub fn request(mut self, request: Request) -> Self {
        self.inner.request = request;
        self
    }

    pub fn url_chain(mut self, chain: Vec<String>) -> Self {
        self.inner.url_chain = chain;
        self
    }

    pub fn sent_at(mut self, at: OffsetDateTime) -> Self {
        self.inner.sent_at = at;
        self
    }

    pub fn received_at(mut self, at: OffsetDateTime) -> Self {
        self.inner.received_at = at;
        self
    }

    pub fn received_byte_count(mut self, count: u64) -> Self {
        self.inner.received_byte_count = count;
        self
    }

    pub fn build(self) -> Response {
        self.inner
    }
}
