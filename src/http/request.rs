//! Canonical outbound request.

use crate::http::headers::{Headers, InvalidHeader};
use crate::http::requestbody::RequestBody;
use http::Method;
use url::Url;

/// An HTTP request as seen by the interceptor pipeline.
///
/// Immutable once built; use [`Request::to_builder`] to derive a modified copy.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Headers,
    body: Option<RequestBody>,
}

impl Request {
    pub fn builder(url: Url) -> RequestBuilder {
        RequestBuilder {
            method: Method::GET,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Shorthand for a GET request to `url`.
    pub fn get(url: Url) -> Self {
        Self::builder(url).build()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_str(name)
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Whether the URL uses a TLS scheme.
    pub fn is_https(&self) -> bool {
        is_secure_scheme(self.url.scheme())
    }

    pub fn to_builder(&self) -> RequestBuilder {
        RequestBuilder {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

pub(crate) fn is_secure_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("wss")
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: Headers,
    body: Option<RequestBody>,
}

impl RequestBuilder {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }

    /// Append a header; duplicates are kept.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, InvalidHeader> {
        self.headers.append(name, value)?;
        Ok(self)
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}
