//! Allowlist scope key.
//!
//! Allowlists are partitioned by a logical scope identifier. This deployment
//! uses a single system-wide scope, but the key is explicit so stores stay
//! testable with multiple isolated scopes.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Name of the single system-wide scope.
const SYSTEM_SCOPE: &str = "system";

/// Logical key partitioning allowlist state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    /// Create a scope with an explicit name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The system-wide scope used by this deployment.
    #[must_use]
    pub fn system() -> Self {
        Self(SYSTEM_SCOPE.to_string())
    }

    /// Scope name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::system()
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
