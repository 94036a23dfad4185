use authsign_core::hash::hex_sha256;
use authsign_core::{ChecksumDirective, ChecksumPlacement, Error, Result};
use authsign_core::{SigningPayload, SigningRequest};
use log::debug;

use crate::config::Config;
use crate::constants::*;

/// Add the checksum header or the trailer declaration to the request.
///
/// Must run before canonicalization so the added headers are signed.
pub(crate) fn integrate_checksum(
    req: &mut SigningRequest,
    directive: &ChecksumDirective,
) -> Result<()> {
    let name = directive.header_name.as_str();

    match directive.placement {
        ChecksumPlacement::Header => {
            if req.headers.contains_key(name) {
                debug!("checksum header {name} already present, keep it");
                return Ok(());
            }

            let value = match (&directive.value, req.payload.as_bytes()) {
                (Some(v), _) => v.clone(),
                (None, Some(bs)) => directive.algorithm.compute(bs),
                (None, None) => {
                    return Err(Error::payload_invalid(format!(
                        "{} checksum in header {name} requires an in-memory payload",
                        directive.algorithm
                    )))
                }
            };
            debug!("add checksum header {name}: {value}");
            req.header_insert(name, &value)
        }
        ChecksumPlacement::Trailer => {
            for value in req.headers.get_all(X_AMZ_TRAILER).iter() {
                let declared = value
                    .to_str()?
                    .split(',')
                    .any(|v| v.trim().eq_ignore_ascii_case(name));
                if declared {
                    debug!("trailer {name} already declared");
                    return Ok(());
                }
            }

            debug!("declare checksum trailer {name}");
            req.header_append(X_AMZ_TRAILER, name)
        }
    }
}

/// Resolve the hashed payload of the canonical request.
///
/// - A value already set in `x-amz-content-sha256` is used as is, except
///   `required` which is replaced by the computed hash.
/// - Otherwise the hash is computed, and sent in `x-amz-content-sha256` if
///   the config asks for it.
pub(crate) fn resolve_payload_hash(
    req: &mut SigningRequest,
    config: &Config,
    has_trailer: bool,
) -> Result<String> {
    let existing = req
        .header_get(X_AMZ_CONTENT_SHA_256)?
        .map(|v| v.to_string());

    match existing {
        Some(v) if !v.eq_ignore_ascii_case(CONTENT_SHA256_REQUIRED) => Ok(v),
        existing => {
            let hash = payload_hash(&req.payload, has_trailer);
            if existing.is_some() || config.content_sha256_header {
                req.header_insert(X_AMZ_CONTENT_SHA_256, &hash)?;
            }
            Ok(hash)
        }
    }
}

fn payload_hash(payload: &SigningPayload, has_trailer: bool) -> String {
    match payload {
        SigningPayload::Bytes(bs) => hex_sha256(bs),
        SigningPayload::Streaming { .. } if has_trailer => {
            STREAMING_UNSIGNED_PAYLOAD_TRAILER.to_string()
        }
        SigningPayload::Streaming { .. } | SigningPayload::Unsigned => UNSIGNED_PAYLOAD.to_string(),
    }
}
