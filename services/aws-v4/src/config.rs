use std::collections::BTreeSet;

use authsign_core::{Env, Error, Result};
use http::header;
use log::debug;

use crate::constants::*;

/// How the transmitted path is encoded in the canonical request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PercentEncodingMode {
    /// Encode the already encoded path once more, `%20` becomes `%2520`.
    ///
    /// Used by every service except S3.
    #[default]
    Double,
    /// Decode the path and encode it again, `%20` stays `%20`.
    Single,
}

/// Config for the aws v4 signer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name of the credential scope, like `s3` or `dynamodb`.
    pub service: String,
    /// `region` will be loaded from:
    ///
    /// - this field if it's not empty
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: String,
    /// Lowercase header names never included in the signature.
    ///
    /// Default to `authorization`, `connection`, `expect`, `user-agent` and
    /// `x-amzn-trace-id`.
    pub excluded_headers: BTreeSet<String>,
    /// Encoding applied to the path in the canonical request.
    pub percent_encoding: PercentEncodingMode,
    /// Remove `.` and `..` segments and repeated slashes from the canonical
    /// path.
    pub normalize_path: bool,
    /// Always send and sign `x-amz-content-sha256` with the hashed payload.
    pub content_sha256_header: bool,
    /// Include `x-amz-security-token` in the signature.
    ///
    /// By default the token is added after signing, so it's sent but not
    /// signed.
    pub sign_security_token: bool,
}

impl Config {
    /// Create a config for the given service and region.
    ///
    /// `s3` gets its own canonicalization rules: single encoded path, no
    /// path normalization and a signed `x-amz-content-sha256` header.
    pub fn new(service: &str, region: &str) -> Self {
        let is_s3 = service == "s3";

        Self {
            service: service.to_string(),
            region: region.to_string(),
            excluded_headers: default_excluded_headers(),
            percent_encoding: if is_s3 {
                PercentEncodingMode::Single
            } else {
                PercentEncodingMode::Double
            },
            normalize_path: !is_s3,
            content_sha256_header: is_s3,
            sign_security_token: false,
        }
    }

    /// Load config from env.
    pub fn from_env(mut self, env: &impl Env) -> Self {
        if self.region.is_empty() {
            if let Some(v) = env
                .var(AWS_REGION)
                .or_else(|| env.var(AWS_DEFAULT_REGION))
            {
                debug!("load region from env: {v}");
                self.region = v;
            }
        }
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Replace the excluded header names.
    pub fn with_excluded_headers<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.excluded_headers = names.into_iter().map(|v| v.to_ascii_lowercase()).collect();
        self
    }

    /// Exclude one more header from the signature.
    pub fn with_excluded_header(mut self, name: &str) -> Self {
        self.excluded_headers.insert(name.to_ascii_lowercase());
        self
    }

    /// Set the path encoding mode.
    pub fn with_percent_encoding(mut self, mode: PercentEncodingMode) -> Self {
        self.percent_encoding = mode;
        self
    }

    /// Enable or disable path normalization.
    pub fn with_normalize_path(mut self, normalize: bool) -> Self {
        self.normalize_path = normalize;
        self
    }

    /// Enable or disable the `x-amz-content-sha256` header.
    pub fn with_content_sha256_header(mut self, enabled: bool) -> Self {
        self.content_sha256_header = enabled;
        self
    }

    /// Sign `x-amz-security-token` instead of adding it after signing.
    pub fn with_sign_security_token(mut self, sign: bool) -> Self {
        self.sign_security_token = sign;
        self
    }

    /// Check if the header is left out of the signature.
    ///
    /// `name` must be lowercase, like every `http::HeaderName`.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_headers.contains(name)
    }

    /// Check the config can be used to sign requests.
    pub fn validate(&self) -> Result<()> {
        if self.service.is_empty() {
            return Err(Error::config_invalid("service is required for signing"));
        }
        if self.region.is_empty() {
            return Err(Error::config_invalid("region is required for signing"));
        }
        Ok(())
    }
}

fn default_excluded_headers() -> BTreeSet<String> {
    [
        header::AUTHORIZATION.as_str(),
        header::CONNECTION.as_str(),
        header::EXPECT.as_str(),
        header::USER_AGENT.as_str(),
        X_AMZN_TRACE_ID,
    ]
    .into_iter()
    .map(|v| v.to_string())
    .collect()
}
