use std::fmt;

use authsign_core::hash::{hex_hmac_sha256, hmac_sha256};
use authsign_core::time::{format_date, DateTime};
use authsign_core::{Error, Result};

use crate::constants::AWS4_REQUEST;

/// Scope the signature is valid for: `20220313/<region>/<service>/aws4_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    date: String,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Build the scope of a request signed at `time`.
    pub fn new(time: DateTime, region: &str, service: &str) -> Result<Self> {
        if region.is_empty() {
            return Err(Error::config_invalid("region is required for signing"));
        }
        if service.is_empty() {
            return Err(Error::config_invalid("service is required for signing"));
        }

        Ok(Self {
            date: format_date(time),
            region: region.to_string(),
            service: service.to_string(),
        })
    }

    /// Date part of the scope: `20220313`
    pub fn date(&self) -> &str {
        &self.date
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, AWS4_REQUEST
        )
    }
}

/// Key derived from the secret access key for one scope.
///
/// Only lives for a single signing call.
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Derive the signing key through the HMAC chain
    /// `date -> region -> service -> aws4_request`.
    pub fn derive(secret: &str, scope: &CredentialScope) -> Self {
        // Sign secret
        let secret = format!("AWS4{secret}");
        // Sign date
        let sign_date = hmac_sha256(secret.as_bytes(), scope.date.as_bytes());
        // Sign region
        let sign_region = hmac_sha256(sign_date.as_slice(), scope.region.as_bytes());
        // Sign service
        let sign_service = hmac_sha256(sign_region.as_slice(), scope.service.as_bytes());
        // Sign request
        let sign_request = hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes());

        Self(sign_request)
    }

    /// Hex encoded signature of the string to sign.
    pub fn sign(&self, string_to_sign: &str) -> String {
        hex_hmac_sha256(&self.0, string_to_sign.as_bytes())
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(***)")
    }
}
