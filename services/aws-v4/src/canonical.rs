//! Canonical request construction.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;

use authsign_core::{Result, SigningRequest, QUERY_ENCODE_SET};
use percent_encoding::utf8_percent_encode;

use crate::config::{Config, PercentEncodingMode};
use crate::constants::AWS_URI_ENCODE_SET;

/// CanonicalRequest is the normalized form of a request that both sides
/// hash and sign.
///
/// Rendered with `Display`:
///
/// ```text
/// METHOD
/// CanonicalURI
/// CanonicalQuery
/// name:value        (one line per signed header)
///
/// SignedHeaders
/// HashedPayload
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// HTTP method.
    pub method: String,
    /// Encoded path.
    pub path: String,
    /// Sorted and encoded query string.
    pub query: String,
    /// Signed headers sorted by lowercase name with folded values.
    pub headers: Vec<(String, String)>,
    /// Hex encoded payload hash or a payload sentinel.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request from a signing request.
    ///
    /// Every header of `req` not excluded by `config` is signed, so callers
    /// must insert `host` and `x-amz-date` before calling this.
    pub fn build(req: &SigningRequest, config: &Config, payload_hash: &str) -> Result<Self> {
        Ok(Self {
            method: req.method.as_str().to_string(),
            path: canonical_uri(req, config)?,
            query: canonical_query(&req.query),
            headers: canonical_headers(req, config)?,
            payload_hash: payload_hash.to_string(),
        })
    }

    /// Signed header names joined by `;`.
    pub fn signed_headers(&self) -> String {
        self.headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        write!(f, "{}", self.payload_hash)
    }
}

fn canonical_uri(req: &SigningRequest, config: &Config) -> Result<String> {
    let path: Cow<'_, str> = match config.percent_encoding {
        PercentEncodingMode::Double => Cow::Borrowed(req.path.as_str()),
        PercentEncodingMode::Single => req.path_percent_decoded()?,
    };
    if path.is_empty() {
        return Ok("/".to_string());
    }

    let path = if config.normalize_path {
        Cow::Owned(normalize_path(&path))
    } else {
        path
    };

    Ok(utf8_percent_encode(&path, &AWS_URI_ENCODE_SET).to_string())
}

/// Remove `.` and `..` segments and empty segments from the path.
///
/// A trailing slash is kept, the result always starts with `/`.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            v => segments.push(v),
        }
    }

    let mut normalized = String::with_capacity(path.len());
    for segment in segments.iter() {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() || path.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

fn canonical_query(query: &[(String, Option<String>)]) -> String {
    let mut pairs = query
        .iter()
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v.as_deref().unwrap_or_default(), &QUERY_ENCODE_SET)
                    .to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort_unstable();

    let mut s = String::new();
    for (k, v) in pairs.iter() {
        if !s.is_empty() {
            s.push('&');
        }
        // Writing into a String never fails.
        let _ = write!(s, "{k}={v}");
    }
    s
}

fn canonical_headers(req: &SigningRequest, config: &Config) -> Result<Vec<(String, String)>> {
    let mut headers = Vec::with_capacity(req.headers.keys_len());
    for name in req.headers.keys() {
        if config.is_excluded(name.as_str()) {
            continue;
        }

        let mut folded = String::new();
        for (idx, value) in req.headers.get_all(name).iter().enumerate() {
            if idx > 0 {
                folded.push(',');
            }
            fold_value(&mut folded, value.to_str()?);
        }
        headers.push((name.as_str().to_string(), folded));
    }
    headers.sort_unstable();

    Ok(headers)
}

/// Trim the value and collapse every inner whitespace run into one space.
///
/// Quotes are plain characters here, `"  a   b  "` keeps its quotes.
fn fold_value(folded: &mut String, value: &str) {
    for (idx, word) in value.split_ascii_whitespace().enumerate() {
        if idx > 0 {
            folded.push(' ');
        }
        folded.push_str(word);
    }
}
