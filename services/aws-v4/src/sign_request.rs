use std::fmt::Write;
use std::sync::Arc;

use authsign_core::hash::hex_sha256;
use authsign_core::time::{format_iso8601, Clock, DateTime, FixedClock, SystemClock};
use authsign_core::{ChecksumDirective, ChecksumPlacement, Error, Result};
use authsign_core::{SignRequest, SigningRequest};
use http::{header, HeaderValue};
use log::debug;

use crate::canonical::CanonicalRequest;
use crate::checksum::{integrate_checksum, resolve_payload_hash};
use crate::constants::*;
use crate::scope::{CredentialScope, SigningKey};
use crate::{Config, Credential, Identity};

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signer holds no mutable state. Share one instance between threads
/// with `Arc`.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    config: Config,
    clock: Arc<dyn Clock>,
}

/// Intermediate values of one signing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutput {
    /// Canonical request that was hashed.
    pub canonical_request: String,
    /// String the signature was computed over.
    pub string_to_sign: String,
    /// Credential scope: `20220313/<region>/<service>/aws4_request`
    pub scope: String,
    /// Signed header names joined by `;`.
    pub signed_headers: String,
    /// Hex encoded signature.
    pub signature: String,
}

impl RequestSigner {
    /// Create a new signer for AWS V4.
    pub fn new(service: &str, region: &str) -> Self {
        Self::from_config(Config::new(service, region))
    }

    /// Create a new signer from config.
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock the signing time is read from.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(self, time: DateTime) -> Self {
        self.with_clock(FixedClock(time))
    }

    /// Config used by this signer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sign the request with a keyed credential at the given time.
    ///
    /// Returns the signed copy of `req` along with the intermediate values.
    /// `req` itself is never modified.
    pub fn calculate(
        &self,
        req: &SigningRequest,
        cred: &Credential,
        checksum: Option<&ChecksumDirective>,
        now: DateTime,
    ) -> Result<(SigningRequest, SigningOutput)> {
        self.config.validate()?;
        if cred.access_key_id.is_empty() || cred.secret_access_key.is_empty() {
            return Err(Error::credential_invalid(
                "access key id and secret access key are required for signing",
            ));
        }

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = CredentialScope::new(now, &self.config.region, &self.config.service)?;
        debug!("calculated scope: {scope}");

        let mut signed_req = req.clone();
        // Drop the values of a previous signing round.
        signed_req.headers.remove(header::AUTHORIZATION);
        let unsigned_token = if self.config.sign_security_token {
            None
        } else {
            signed_req.headers.remove(X_AMZ_SECURITY_TOKEN)
        };

        let has_trailer = match checksum {
            Some(directive) => {
                integrate_checksum(&mut signed_req, directive)?;
                directive.placement == ChecksumPlacement::Trailer
            }
            None => false,
        };
        let payload_hash = resolve_payload_hash(&mut signed_req, &self.config, has_trailer)?;

        canonicalize_header(&mut signed_req, cred, now, self.config.sign_security_token)?;

        // build canonical request and string to sign.
        let creq = CanonicalRequest::build(&signed_req, &self.config, &payload_hash)?;
        let canonical_request = creq.to_string();
        debug!("calculated canonical request: {canonical_request}");

        let string_to_sign = string_to_sign(now, &scope, &canonical_request)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = SigningKey::derive(&cred.secret_access_key, &scope);
        let signature = signing_key.sign(&string_to_sign);
        let signed_headers = creq.signed_headers();

        let mut authorization = HeaderValue::from_str(&format!(
            "{AWS4_HMAC_SHA256} Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id, scope, signed_headers, signature
        ))?;
        authorization.set_sensitive(true);
        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Security token is sent along but left out of the signature.
        if !self.config.sign_security_token {
            let token = match &cred.session_token {
                Some(token) => Some(HeaderValue::from_str(token)?),
                None => unsigned_token,
            };
            if let Some(mut token) = token {
                token.set_sensitive(true);
                signed_req.headers.insert(X_AMZ_SECURITY_TOKEN, token);
            }
        }

        Ok((
            signed_req,
            SigningOutput {
                canonical_request,
                string_to_sign,
                scope: scope.to_string(),
                signed_headers,
                signature,
            },
        ))
    }
}

impl SignRequest for RequestSigner {
    type Identity = Identity;

    fn sign_request(
        &self,
        req: &SigningRequest,
        identity: &Self::Identity,
        checksum: Option<&ChecksumDirective>,
    ) -> Result<SigningRequest> {
        let now = self.clock.now();

        match identity {
            Identity::Anonymous => {
                debug!("identity is anonymous, skip signing");
                Ok(req.clone())
            }
            Identity::Keyed(cred) => self
                .calculate(req, cred, checksum, now)
                .map(|(signed_req, _)| signed_req),
        }
    }
}

fn canonicalize_header(
    req: &mut SigningRequest,
    cred: &Credential,
    now: DateTime,
    sign_security_token: bool,
) -> Result<()> {
    // Insert HOST header if not present.
    if !req.headers.contains_key(header::HOST) {
        let Some(authority) = &req.authority else {
            return Err(Error::request_invalid(
                "request has neither host header nor authority",
            ));
        };
        // Userinfo is never sent in the host header.
        let host = match authority.port() {
            Some(port) => format!("{}:{}", authority.host(), port),
            None => authority.host().to_string(),
        };
        let host = HeaderValue::from_str(&host)?;
        req.headers.insert(header::HOST, host);
    }

    // Replace DATE header, a stale one is left by previous signing.
    req.header_insert(X_AMZ_DATE, &format_iso8601(now))?;

    if sign_security_token {
        if let Some(token) = &cred.session_token {
            let mut value = HeaderValue::from_str(token)?;
            // Set token value sensitive to valid leaking.
            value.set_sensitive(true);
            req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }
    }

    Ok(())
}

// StringToSign:
//
// AWS4-HMAC-SHA256
// 20220313T072004Z
// 20220313/<region>/<service>/aws4_request
// <hashed_canonical_request>
fn string_to_sign(now: DateTime, scope: &CredentialScope, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{}", format_iso8601(now))?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}
