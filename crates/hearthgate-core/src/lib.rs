//! Hearthgate Core Library
//!
//! Shared types for the Hearthgate dual-factor access control service.
//!
//! # Modules
//!
//! - [`credential`] - Opaque bearer credential with redacted debug output
//! - [`request`] - Per-request input ([`AccessRequest`])
//! - [`decision`] - Evaluation output ([`AccessDecision`], [`ReasonCode`], [`AccessMethod`])
//! - [`scope`] - Allowlist scope key ([`Scope`])
//!
//! # Example
//!
//! ```
//! use hearthgate_core::{AccessRequest, Credential, ReasonCode};
//!
//! let request = AccessRequest::new("203.0.113.5")
//!     .with_credential(Credential::new("opaque-bearer-token"));
//!
//! assert_eq!(ReasonCode::OriginNotAllowed.status_code(), 403);
//! ```

pub mod credential;
pub mod decision;
pub mod request;
pub mod scope;

// Re-export main types for convenient access
pub use credential::Credential;
pub use decision::{AccessDecision, AccessMethod, IdentityAssertion, ReasonCode};
pub use request::AccessRequest;
pub use scope::Scope;
