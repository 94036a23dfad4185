use async_trait::async_trait;
use authsign_core::hash::hex_hmac_sha256;
use authsign_core::time::{format_iso8601, now};
use authsign_core::{ChecksumDirective, ProvideIdentity, Result, SignRequest};
use authsign_core::{Env, OsEnv, Signer, SigningCredential, SigningPayload, SigningRequest};

// Define a custom credential type
#[derive(Clone, Debug)]
struct MyCredential {
    api_key: String,
    api_secret: String,
}

impl SigningCredential for MyCredential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

// Resolve the credential from environment, falling back to demo keys.
#[derive(Debug)]
struct MyIdentityProvider;

#[async_trait]
impl ProvideIdentity for MyIdentityProvider {
    type Identity = MyCredential;

    async fn provide_identity(&self) -> Result<Self::Identity> {
        Ok(MyCredential {
            api_key: OsEnv.var("MY_API_KEY").unwrap_or_else(|| "demo-api-key".to_string()),
            api_secret: OsEnv
                .var("MY_API_SECRET")
                .unwrap_or_else(|| "demo-api-secret".to_string()),
        })
    }
}

// Sign `METHOD\nPATH\nTIMESTAMP` with the api secret.
#[derive(Debug)]
struct MySigner;

impl SignRequest for MySigner {
    type Identity = MyCredential;

    fn sign_request(
        &self,
        req: &SigningRequest,
        identity: &Self::Identity,
        _: Option<&ChecksumDirective>,
    ) -> Result<SigningRequest> {
        let timestamp = format_iso8601(now());
        let string_to_sign = format!("{}\n{}\n{}", req.method, req.path, timestamp);
        let signature = hex_hmac_sha256(identity.api_secret.as_bytes(), string_to_sign.as_bytes());

        let mut signed = req.clone();
        signed.header_insert("x-api-key", &identity.api_key)?;
        signed.header_insert("x-timestamp", &timestamp)?;
        signed.header_insert("x-signature", &signature)?;
        Ok(signed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let signer = Signer::new(MyIdentityProvider, MySigner);

    let (mut parts, _) = http::Request::get("https://api.example.com/v1/users")
        .body(())?
        .into_parts();

    signer
        .sign(&mut parts, SigningPayload::Unsigned, None)
        .await?;

    for (name, value) in parts.headers.iter() {
        println!("{name}: {}", value.to_str()?);
    }
    Ok(())
}
