//! Inbound translation: engine response metadata to the canonical model.

use crate::engine::UrlResponseInfo;
use crate::http::{Headers, Protocol, Request, Response, ResponseBuilder};
use http::header::CONTENT_ENCODING;
use time::OffsetDateTime;

/// Status line and headers of a response whose body is still streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResponse {
    pub code: u16,
    pub message: String,
    pub protocol: Protocol,
    pub headers: Headers,
}

impl PartialResponse {
    /// Start a canonical response to `request` from this status line.
    pub fn to_builder(&self, request: Request, sent_at: OffsetDateTime) -> ResponseBuilder {
        Response::builder(request)
            .sent_at(sent_at)
            .code(self.code)
            .message(self.message.clone())
            .protocol(self.protocol)
            .headers(self.headers.clone())
    }
}

/// Translate the engine's response metadata.
///
/// `Content-Encoding` is dropped because the engine has already decoded the
/// body. Headers the canonical model rejects are skipped with a warning.
pub fn translate(info: &UrlResponseInfo) -> PartialResponse {
    PartialResponse {
        code: info.http_status_code,
        message: info.http_status_text.clone(),
        protocol: Protocol::from_negotiated(&info.negotiated_protocol),
        headers: translate_headers(&info.all_headers),
    }
}

fn translate_headers(raw: &[(String, String)]) -> Headers {
    let mut headers = Headers::with_capacity(raw.len());
    for (name, value) in raw {
        match Headers::parse(name, value) {
            Ok((name, _)) if name == CONTENT_ENCODING => continue,
            Ok((name, value)) => headers.append_typed(name, value),
            Err(e) => {
                tracing::warn!(error = %e, "skipping invalid response header");
            }
        }
    }
    headers
}
