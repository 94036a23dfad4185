use crate::{Credential, Identity};
use async_trait::async_trait;
use authsign_core::{ProvideIdentity, Result};

/// StaticIdentityProvider always returns the same identity.
///
/// Use [`StaticIdentityProvider::anonymous`] to send requests unsigned.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    /// Create a new StaticIdentityProvider with access key ID and secret access key.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            identity: Identity::Keyed(Credential::new(access_key_id, secret_access_key)),
        }
    }

    /// Create a provider for anonymous requests.
    pub fn anonymous() -> Self {
        Self {
            identity: Identity::Anonymous,
        }
    }

    /// Set the session token.
    ///
    /// Has no effect on an anonymous provider.
    pub fn with_session_token(mut self, token: &str) -> Self {
        if let Identity::Keyed(cred) = self.identity {
            self.identity = Identity::Keyed(cred.with_session_token(token));
        }
        self
    }
}

impl From<Identity> for StaticIdentityProvider {
    fn from(identity: Identity) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl ProvideIdentity for StaticIdentityProvider {
    type Identity = Identity;

    async fn provide_identity(&self) -> Result<Self::Identity> {
        Ok(self.identity.clone())
    }
}
