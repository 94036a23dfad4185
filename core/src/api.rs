use std::fmt::Debug;

use crate::{ChecksumDirective, Result, SigningRequest};

/// SigningCredential is implemented by credentials that can expire or be
/// malformed.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is usable for signing right now.
    fn is_valid(&self) -> bool;
}

/// ProvideIdentity resolves the identity used to sign a request.
///
/// Service may require different identity to sign the request, for example,
/// AWS requires access key and secret key, and also accepts anonymous
/// requests.
#[async_trait::async_trait]
pub trait ProvideIdentity: Debug + Send + Sync + Unpin + 'static {
    /// Identity returned by this provider.
    type Identity: Send + Sync + Unpin + 'static;

    /// Resolve the identity from the current environment.
    async fn provide_identity(&self) -> Result<Self::Identity>;
}

/// SignRequest is implemented by service signers.
///
/// Signing is synchronous, pure CPU work. Implementations must not keep
/// mutable state so one instance can be shared across threads.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Identity used by this signer.
    type Identity: Send + Sync + Unpin + 'static;

    /// Sign the request and return the signed copy.
    ///
    /// ## Checksum
    ///
    /// The optional `checksum` asks the signer to protect the payload with a
    /// checksum header or to announce a checksum trailer.
    ///
    /// ## Errors
    ///
    /// On error the input request is untouched, no partially signed request
    /// is ever returned.
    fn sign_request(
        &self,
        req: &SigningRequest,
        identity: &Self::Identity,
        checksum: Option<&ChecksumDirective>,
    ) -> Result<SigningRequest>;
}
