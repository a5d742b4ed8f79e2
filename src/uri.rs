//! Link assembly helpers: escaping, authority formatting and ordered query strings.

use base64::Engine;

/// Standard (padded) Base64 of a UTF-8 string.
pub(crate) fn b64(s: &str) -> String {
    b64_bytes(s.as_bytes())
}

pub(crate) fn b64_bytes(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Query-component escaping: unreserved characters are kept, space becomes `+`,
/// everything else is percent-encoded.
pub(crate) fn query_escape(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

/// Percent-encodes a userinfo component so `@`, `:` and `/` cannot leak into the authority.
pub(crate) fn userinfo_escape(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// `host:port`, bracketing IPv6 literals (scoped ones included).
pub(crate) fn authority(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Ordered `key=value` pairs; values are form-encoded on output.
#[derive(Debug, Default)]
pub(crate) struct QueryBuilder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key, value.into()));
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `k=v&k=v` in insertion order.
    pub(crate) fn finish(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}
