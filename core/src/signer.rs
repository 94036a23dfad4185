use std::sync::Arc;

use log::debug;

use crate::{ChecksumDirective, Error, ProvideIdentity, Result, SignRequest};
use crate::{SigningCredential, SigningPayload, SigningRequest};

/// Signer is the main struct used to sign the request.
///
/// It resolves an identity for every call and hands it to the service
/// signer. Identity caching, if any, belongs to the provider.
#[derive(Clone, Debug)]
pub struct Signer<I: SigningCredential> {
    provider: Arc<dyn ProvideIdentity<Identity = I>>,
    builder: Arc<dyn SignRequest<Identity = I>>,
}

impl<I: SigningCredential> Signer<I> {
    /// Create a new signer.
    pub fn new(
        provider: impl ProvideIdentity<Identity = I>,
        builder: impl SignRequest<Identity = I>,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            builder: Arc::new(builder),
        }
    }

    /// Signing request.
    ///
    /// `parts` is only updated when signing succeeds.
    pub async fn sign(
        &self,
        parts: &mut http::request::Parts,
        payload: SigningPayload,
        checksum: Option<&ChecksumDirective>,
    ) -> Result<()> {
        let identity = self.provider.provide_identity().await?;
        if !identity.is_valid() {
            return Err(Error::credential_invalid(
                "resolved identity is empty or about to expire",
            ));
        }

        let req = SigningRequest::build(parts, payload)?;
        let signed = self.builder.sign_request(&req, &identity, checksum)?;
        debug!("signed request: {} {}", signed.method, signed.path);

        signed.apply(parts)
    }
}
