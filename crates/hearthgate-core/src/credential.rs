//! Opaque bearer credential.
//!
//! The raw token must never appear in logs, error chains, or audit records,
//! so the wrapper redacts itself in both `Debug` and `Display` and is not
//! serializable. Code that actually needs the token (the identity verifier)
//! calls [`Credential::expose`].

use std::fmt;

/// An opaque bearer token presented by a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Access the raw token value.
    ///
    /// Callers are responsible for keeping the returned value out of logs
    /// and persisted records.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the wrapped token is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
