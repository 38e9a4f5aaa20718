use std::fmt;

/// Application protocol a response was received over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    #[default]
    Http10,
    Http11,
    Http2,
    Quic,
}

impl Protocol {
    /// Classify the engine's negotiated protocol string (ALPN id or similar).
    ///
    /// Case-insensitive substring match; `quic` wins over `h2`, which wins
    /// over `1.1`. Anything else, including the empty string, is HTTP/1.0.
    pub fn from_negotiated(negotiated: &str) -> Self {
        let negotiated = negotiated.to_ascii_lowercase();
        if negotiated.contains("quic") {
            Protocol::Quic
        } else if negotiated.contains("h2") {
            Protocol::Http2
        } else if negotiated.contains("1.1") {
            Protocol::Http11
        } else {
            Protocol::Http10
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http10 => "http/1.0",
            Protocol::Http11 => "http/1.1",
            Protocol::Http2 => "h2",
            Protocol::Quic => "quic",
        }
    }

    /// Closest `http::Version`; QUIC maps to HTTP/3.
    pub fn version(&self) -> http::Version {
        match self {
            Protocol::Http10 => http::Version::HTTP_10,
            Protocol::Http11 => http::Version::HTTP_11,
            Protocol::Http2 => http::Version::HTTP_2,
            Protocol::Quic => http::Version::HTTP_3,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
