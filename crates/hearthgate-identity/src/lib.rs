//! Identity-provider credential verification for Hearthgate.
//!
//! A bearer credential is verified by delegating to an external identity
//! provider: the provider decides whether the token is currently valid and,
//! if so, returns a stable subject identifier and display name. This crate
//! defines the [`IdentityVerifier`] contract, a typed failure taxonomy that
//! keeps attacker behavior (`Invalid`) distinct from operational failure
//! (`ProviderUnavailable`), and an HTTP userinfo-endpoint implementation
//! with a hard request timeout. No retries happen here; retry policy, if
//! any, belongs to the caller.

pub mod config;
pub mod error;
pub mod userinfo;
pub mod verifier;

pub use config::{ConfigError, UserinfoConfig};
pub use error::VerificationError;
pub use userinfo::UserinfoVerifier;
pub use verifier::{IdentityVerifier, MockVerifier};
