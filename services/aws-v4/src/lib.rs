//! AWS SigV4 service signer
//!
//! ## Example
//!
//! ```no_run
//! use authsign_aws_v4::{RequestSigner, StaticIdentityProvider};
//! use authsign_core::{Result, Signer, SigningPayload};
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(
//!     StaticIdentityProvider::new("access_key_id", "secret_access_key"),
//!     RequestSigner::new("dynamodb", "us-east-1"),
//! );
//!
//! let body = r#"{"TableName": "foo"}"#;
//! let mut parts = http::Request::builder()
//!     .method("POST")
//!     .uri("https://dynamodb.us-east-1.amazonaws.com/")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, SigningPayload::from(body), None).await?;
//! # Ok(())
//! # }
//! ```

mod canonical;
pub use canonical::CanonicalRequest;

mod checksum;

mod config;
pub use config::Config;
pub use config::PercentEncodingMode;

mod constants;
pub use constants::AWS_URI_ENCODE_SET;

mod credential;
pub use credential::Credential;
pub use credential::Identity;

mod provide_identity;
pub use provide_identity::*;

mod scope;
pub use scope::CredentialScope;
pub use scope::SigningKey;

mod sign_request;
pub use sign_request::RequestSigner;
pub use sign_request::SigningOutput;
