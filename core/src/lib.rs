//! Core components for signing API requests.
//!
//! This crate provides the foundational types and traits shared by service
//! signers. It defines the abstractions that keep identity resolution,
//! request representation and the signing computation apart.
//!
//! ## Overview
//!
//! - **SigningRequest**: an owned copy of the request (method, uri parts,
//!   ordered query pairs, headers and payload) that signers work on
//! - **Traits**: identity resolution (`ProvideIdentity`) and request signing
//!   (`SignRequest`)
//! - **Signer**: the orchestrator that resolves an identity, signs a copy of
//!   the request and applies the result back to `http::request::Parts`
//!
//! ## Example
//!
//! ```no_run
//! use authsign_core::{ChecksumDirective, ProvideIdentity, Result, SignRequest, Signer};
//! use authsign_core::{SigningCredential, SigningPayload, SigningRequest};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Token(String);
//!
//! impl SigningCredential for Token {
//!     fn is_valid(&self) -> bool {
//!         !self.0.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideIdentity for MyProvider {
//!     type Identity = Token;
//!
//!     async fn provide_identity(&self) -> Result<Self::Identity> {
//!         Ok(Token("my-token".to_string()))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! impl SignRequest for MySigner {
//!     type Identity = Token;
//!
//!     fn sign_request(
//!         &self,
//!         req: &SigningRequest,
//!         identity: &Self::Identity,
//!         _checksum: Option<&ChecksumDirective>,
//!     ) -> Result<SigningRequest> {
//!         let mut signed = req.clone();
//!         signed.header_insert("authorization", &format!("Bearer {}", identity.0))?;
//!         Ok(signed)
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(MyProvider, MySigner);
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://example.com")
//!     .body(())
//!     .unwrap()
//!     .into_parts()
//!     .0;
//!
//! signer.sign(&mut parts, SigningPayload::Unsigned, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting and clocks
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod api;
pub use api::{ProvideIdentity, SignRequest, SigningCredential};
mod checksum;
pub use checksum::{ChecksumAlgorithm, ChecksumDirective, ChecksumHasher, ChecksumPlacement};
mod env;
pub use env::{Env, OsEnv, StaticEnv};
mod error;
pub use error::{Error, ErrorKind, Result};
mod request;
pub use request::{SigningPayload, SigningRequest, QUERY_ENCODE_SET};
mod signer;
pub use signer::Signer;
