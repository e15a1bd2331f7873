/// Errors surfaced by allowlist store operations.
#[derive(Debug, thiserror::Error)]
pub enum AllowlistError {
    #[error("invalid allowlist entry '{entry}': {reason}")]
    InvalidEntry { entry: String, reason: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AllowlistError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidEntry { .. } => "invalid_entry",
            Self::Database(_) => "database_error",
        }
    }

    /// Whether the error was caused by the caller's input rather than a
    /// failing dependency.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidEntry { .. })
    }
}
