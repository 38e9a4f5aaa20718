//! Outbound translation: canonical request to engine dispatch parameters.

use crate::base::context::IoResultExt;
use crate::base::error::BridgeError;
use crate::engine::{EngineRequestParams, UploadDataProvider};
use crate::http::{Headers, Request};
use http::header::{ACCEPT_ENCODING, CONTENT_TYPE};
use http::HeaderValue;

/// Build engine parameters for `request`.
///
/// `Accept-Encoding` is dropped: the engine negotiates compression itself and
/// decodes transparently. A body with a declared content type adds a
/// `Content-Type` header. The body is serialized up front into a single
/// in-memory upload.
pub fn translate(request: &Request) -> Result<EngineRequestParams, BridgeError> {
    let mut headers = Headers::with_capacity(request.headers().len() + 1);
    for (name, value) in request.headers().iter() {
        if *name == ACCEPT_ENCODING {
            continue;
        }
        headers.append_typed(name.clone(), value.clone());
    }

    let upload = match request.body() {
        Some(body) => {
            if let Some(content_type) = body.content_type() {
                match HeaderValue::from_str(content_type) {
                    Ok(value) => headers.append_typed(CONTENT_TYPE, value),
                    Err(_) => {
                        tracing::warn!(content_type, "dropping invalid body content type");
                    }
                }
            }
            let mut buf = Vec::with_capacity(upload_capacity_hint(body.content_length()));
            body.write_to(&mut buf).body_context(request.url())?;
            Some(UploadDataProvider::new(buf))
        }
        None => None,
    };

    tracing::debug!(
        method = %request.method(),
        url = %request.url(),
        headers = headers.len(),
        upload_len = upload.as_ref().map(|u| u.length()),
        "translated request for engine"
    );

    Ok(EngineRequestParams {
        method: request.method().clone(),
        url: request.url().clone(),
        headers,
        upload,
    })
}

/// Largest allocation made up front from a body's declared length.
const MAX_UPLOAD_PREALLOC: usize = 1024 * 1024;

/// Declared lengths are not trusted beyond [`MAX_UPLOAD_PREALLOC`]; the
/// buffer grows as the body is actually written.
fn upload_capacity_hint(declared: Option<u64>) -> usize {
    declared
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0)
        .min(MAX_UPLOAD_PREALLOC)
}
