use std::borrow::Cow;
use std::str::FromStr;

use bytes::Bytes;
use http::header::HeaderName;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

use crate::Result;

/// AsciiSet used to encode query names and values: every byte except the
/// unreserved characters `A-Z a-z 0-9 - . _ ~`.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Payload of the request as seen by the signer.
#[derive(Debug, Clone, Default)]
pub enum SigningPayload {
    /// The whole body is available in memory.
    Bytes(Bytes),
    /// The payload is intentionally not signed.
    #[default]
    Unsigned,
    /// The body will be streamed after signing, so its bytes are not
    /// available to the signer.
    Streaming {
        /// Decoded length of the body if known up front.
        content_length: Option<u64>,
    },
}

impl SigningPayload {
    /// Get the payload bytes if the body is in memory.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SigningPayload::Bytes(bs) => Some(bs.as_ref()),
            _ => None,
        }
    }

    /// Length of the payload if it is known.
    pub fn content_length(&self) -> Option<u64> {
        match self {
            SigningPayload::Bytes(bs) => Some(bs.len() as u64),
            SigningPayload::Unsigned => None,
            SigningPayload::Streaming { content_length } => *content_length,
        }
    }

    /// Check if the payload is deferred to streaming.
    pub fn is_streaming(&self) -> bool {
        matches!(self, SigningPayload::Streaming { .. })
    }
}

impl From<Bytes> for SigningPayload {
    fn from(value: Bytes) -> Self {
        SigningPayload::Bytes(value)
    }
}

impl From<Vec<u8>> for SigningPayload {
    fn from(value: Vec<u8>) -> Self {
        SigningPayload::Bytes(value.into())
    }
}

impl From<&'static str> for SigningPayload {
    fn from(value: &'static str) -> Self {
        SigningPayload::Bytes(Bytes::from_static(value.as_bytes()))
    }
}

impl From<String> for SigningPayload {
    fn from(value: String) -> Self {
        SigningPayload::Bytes(value.into())
    }
}

/// Signing context for request.
///
/// Query parameters and headers keep their insertion order. Signers sort
/// copies of them, never the request itself.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority, absent for origin-form requests.
    pub authority: Option<Authority>,
    /// HTTP path as it will be transmitted, percent encoded.
    pub path: String,
    /// HTTP query parameters, percent decoded.
    ///
    /// A `None` value is a parameter without `=`, like `?acl`.
    pub query: Vec<(String, Option<String>)>,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Request payload.
    pub payload: SigningPayload,
}

impl SigningRequest {
    /// Create a signing request from method and uri without headers or
    /// payload.
    pub fn new(method: Method, uri: &str) -> Result<Self> {
        let uri = Uri::from_str(uri)?;
        Self::from_uri(method, uri, HeaderMap::new(), SigningPayload::Unsigned)
    }

    /// Build a signing request from http::request::Parts.
    ///
    /// The parts are left untouched; call [`SigningRequest::apply`] once
    /// signing succeeded.
    pub fn build(parts: &http::request::Parts, payload: SigningPayload) -> Result<Self> {
        Self::from_uri(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
            payload,
        )
    }

    fn from_uri(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        payload: SigningPayload,
    ) -> Result<Self> {
        let uri = uri.into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let query = parse_query(paq.query().unwrap_or_default());

        Ok(SigningRequest {
            method,
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority,
            path: paq.path().to_string(),
            query,
            headers,
            payload,
        })
    }

    /// Replace the payload.
    pub fn with_payload(mut self, payload: impl Into<SigningPayload>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Apply the signing request back to http::request::Parts.
    ///
    /// The uri of `parts` is only rewritten if the path or the query pairs
    /// changed, so the transmitted query keeps its original encoding.
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        let uri_changed = self.path != parts.uri.path()
            || self.query != parse_query(parts.uri.query().unwrap_or_default());
        if uri_changed {
            parts.uri = self.uri()?;
        }
        parts.method = self.method;
        parts.headers = self.headers;

        Ok(())
    }

    /// Render the uri that will be transmitted.
    ///
    /// Query parameters are rendered in their original order.
    pub fn uri(&self) -> Result<Uri> {
        let mut paq = if self.path.is_empty() {
            "/".to_string()
        } else {
            self.path.clone()
        };

        let mut first = true;
        for (k, v) in self.query.iter() {
            if k.is_empty() && v.is_none() {
                continue;
            }

            paq.push(if first { '?' } else { '&' });
            first = false;

            paq.extend(utf8_percent_encode(k, &QUERY_ENCODE_SET));
            if let Some(v) = v {
                paq.push('=');
                paq.extend(utf8_percent_encode(v, &QUERY_ENCODE_SET));
            }
        }

        let mut uri = http::uri::Parts::default();
        if let Some(authority) = &self.authority {
            uri.scheme = Some(self.scheme.clone());
            uri.authority = Some(authority.clone());
        }
        uri.path_and_query = Some(PathAndQuery::from_str(&paq)?);

        Ok(Uri::from_parts(uri)?)
    }

    /// Get the path percent decoded.
    pub fn path_percent_decoded(&self) -> Result<Cow<'_, str>> {
        Ok(percent_decode_str(&self.path).decode_utf8()?)
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: Option<&str>) {
        self.query.push((key.into(), value.map(|v| v.to_string())));
    }

    /// Append a header value, keeping existing values of the same name.
    pub fn header_append(&mut self, name: &str, value: &str) -> Result<()> {
        self.headers
            .append(HeaderName::from_str(name)?, HeaderValue::from_str(value)?);
        Ok(())
    }

    /// Insert a header value, replacing existing values of the same name.
    pub fn header_insert(&mut self, name: &str, value: &str) -> Result<()> {
        self.headers
            .insert(HeaderName::from_str(name)?, HeaderValue::from_str(value)?);
        Ok(())
    }

    /// Get the first header value by name.
    ///
    /// Returns `None` if header not found.
    pub fn header_get(&self, name: &str) -> Result<Option<&str>> {
        match self.headers.get(name) {
            Some(v) => Ok(Some(v.to_str()?)),
            None => Ok(None),
        }
    }
}

/// Split a raw query string into percent decoded pairs.
///
/// Escapes that are not valid utf-8 decode to `U+FFFD`.
fn parse_query(query: &str) -> Vec<(String, Option<String>)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = match pair.split_once('=') {
                Some((k, v)) => (k, Some(v)),
                None => (pair, None),
            };
            let k = percent_decode_str(k).decode_utf8_lossy().into_owned();
            let v = v.map(|v| percent_decode_str(v).decode_utf8_lossy().into_owned());
            (k, v)
        })
        .collect()
}
