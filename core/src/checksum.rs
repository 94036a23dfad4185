//! Payload checksum algorithms and directives.
//!
//! A [`ChecksumDirective`] tells a signer which algorithm to use, which
//! header carries the value and whether the value is sent as a header or as
//! a trailer after a streamed body. [`ChecksumHasher`] computes the value
//! incrementally for callers that stream the payload themselves.

use std::fmt;
use std::str::FromStr;

use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;

use crate::hash::base64_encode;
use crate::Error;

/// Checksum algorithms a payload can be protected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    /// CRC-32 (IEEE 802.3).
    Crc32,
    /// CRC-32C (Castagnoli).
    Crc32c,
    /// SHA-1.
    Sha1,
    /// SHA-256.
    Sha256,
}

impl ChecksumAlgorithm {
    /// Name of the algorithm as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crc32 => "CRC32",
            Self::Crc32c => "CRC32C",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
        }
    }

    /// Default header carrying a checksum of this algorithm.
    pub fn header_name(&self) -> &'static str {
        match self {
            Self::Crc32 => "x-amz-checksum-crc32",
            Self::Crc32c => "x-amz-checksum-crc32c",
            Self::Sha1 => "x-amz-checksum-sha1",
            Self::Sha256 => "x-amz-checksum-sha256",
        }
    }

    /// Base64 encoded checksum of `data`.
    ///
    /// CRC values are encoded from their big-endian bytes.
    pub fn compute(&self, data: &[u8]) -> String {
        let mut hasher = ChecksumHasher::new(*self);
        hasher.update(data);
        hasher.finalize()
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRC32" => Ok(Self::Crc32),
            "CRC32C" => Ok(Self::Crc32c),
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            _ => Err(Error::config_invalid(format!(
                "unknown checksum algorithm: {s}"
            ))),
        }
    }
}

/// Incremental checksum computation.
///
/// Used by payload streaming code to produce the trailer value once the
/// whole body has been written.
#[derive(Debug, Clone)]
pub enum ChecksumHasher {
    /// CRC-32 state.
    Crc32(crc32fast::Hasher),
    /// CRC-32C running value.
    Crc32c(u32),
    /// SHA-1 state.
    Sha1(Sha1),
    /// SHA-256 state.
    Sha256(Sha256),
}

impl ChecksumHasher {
    /// Create a hasher for the given algorithm.
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Crc32 => Self::Crc32(crc32fast::Hasher::new()),
            ChecksumAlgorithm::Crc32c => Self::Crc32c(0),
            ChecksumAlgorithm::Sha1 => Self::Sha1(Sha1::new()),
            ChecksumAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
        }
    }

    /// Feed more data into the hasher.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Crc32(h) => h.update(data),
            Self::Crc32c(v) => *v = crc32c::crc32c_append(*v, data),
            Self::Sha1(h) => Digest::update(h, data),
            Self::Sha256(h) => Digest::update(h, data),
        }
    }

    /// Consume the hasher and return the base64 encoded checksum.
    pub fn finalize(self) -> String {
        match self {
            Self::Crc32(h) => base64_encode(&h.finalize().to_be_bytes()),
            Self::Crc32c(v) => base64_encode(&v.to_be_bytes()),
            Self::Sha1(h) => base64_encode(&h.finalize()),
            Self::Sha256(h) => base64_encode(&h.finalize()),
        }
    }
}

/// Where the checksum value travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumPlacement {
    /// Computed up front and sent as a signed request header.
    Header,
    /// Computed while the body streams and sent after it as a trailer.
    /// Only the trailer declaration is signed.
    Trailer,
}

/// ChecksumDirective asks the signer to protect the payload with a checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumDirective {
    /// Algorithm used to compute the checksum.
    pub algorithm: ChecksumAlgorithm,
    /// Lowercase name of the header (or trailer) carrying the value.
    pub header_name: String,
    /// Header or trailer placement.
    pub placement: ChecksumPlacement,
    /// Value computed by the caller.
    ///
    /// Used instead of computing one, but never overwrites a value already
    /// present on the request.
    pub value: Option<String>,
}

impl ChecksumDirective {
    /// Create a directive using the algorithm's default header name.
    pub fn new(algorithm: ChecksumAlgorithm, placement: ChecksumPlacement) -> Self {
        Self {
            algorithm,
            header_name: algorithm.header_name().to_string(),
            placement,
            value: None,
        }
    }

    /// Carry the checksum in a custom header.
    pub fn with_header_name(mut self, name: &str) -> Self {
        self.header_name = name.to_ascii_lowercase();
        self
    }

    /// Use a checksum value computed by the caller.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Format the trailer line sent after a streamed body: `name:value`.
    pub fn trailer_line(&self, value: &str) -> String {
        format!("{}:{}", self.header_name, value)
    }
}
