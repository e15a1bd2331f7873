/// Errors from credential verification.
///
/// `Invalid` and `ProviderUnavailable` are deliberately distinct: a rejected
/// token indicates caller behavior, an unreachable provider indicates an
/// operational failure, and the audit trail must not conflate them. Messages
/// never embed the credential itself.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VerificationError {
    /// The token is syntactically invalid; rejected before any network call.
    #[error("malformed credential: {0}")]
    Malformed(String),

    /// The provider rejected the token (expired, revoked, unknown).
    #[error("credential rejected by identity provider: {0}")]
    Invalid(String),

    /// The provider could not be reached or did not answer in time.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl VerificationError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "credential_malformed",
            Self::Invalid(_) => "credential_invalid",
            Self::ProviderUnavailable(_) => "provider_unavailable",
        }
    }
}
