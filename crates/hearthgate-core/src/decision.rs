//! Evaluation output types.
//!
//! An evaluation always terminates in exactly one [`AccessDecision`]. Denials
//! carry a [`ReasonCode`] from a closed enumeration; the audit trail records
//! which gate produced the terminal outcome as an [`AccessMethod`].

use serde::{Deserialize, Serialize};

/// Machine-readable reason for a denial (or `system-error` for dependency
/// failures). The wire form is kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCode {
    /// The request carried no origin address (malformed request).
    OriginMissing,
    /// The origin address is not a member of the allowlist.
    OriginNotAllowed,
    /// The origin passed but no credential was supplied.
    CredentialMissing,
    /// The identity provider rejected the credential (expired, revoked,
    /// unknown).
    CredentialInvalid,
    /// The credential is syntactically invalid.
    CredentialMalformed,
    /// A dependency failed (allowlist store or identity provider); access is
    /// denied fail-closed.
    SystemError,
}

impl ReasonCode {
    /// Caller-visible HTTP status for this reason.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::OriginMissing => 400,
            Self::OriginNotAllowed => 403,
            Self::CredentialMissing | Self::CredentialInvalid | Self::CredentialMalformed => 401,
            Self::SystemError => 503,
        }
    }

    /// Whether the denial was caused by the client rather than a dependency
    /// failure. Dependency failures are alerted on separately even though
    /// both render as "denied" externally.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::SystemError)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OriginMissing => write!(f, "origin-missing"),
            Self::OriginNotAllowed => write!(f, "origin-not-allowed"),
            Self::CredentialMissing => write!(f, "credential-missing"),
            Self::CredentialInvalid => write!(f, "credential-invalid"),
            Self::CredentialMalformed => write!(f, "credential-malformed"),
            Self::SystemError => write!(f, "system-error"),
        }
    }
}

impl std::str::FromStr for ReasonCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "origin-missing" => Ok(Self::OriginMissing),
            "origin-not-allowed" => Ok(Self::OriginNotAllowed),
            "credential-missing" => Ok(Self::CredentialMissing),
            "credential-invalid" => Ok(Self::CredentialInvalid),
            "credential-malformed" => Ok(Self::CredentialMalformed),
            "system-error" => Ok(Self::SystemError),
            _ => Err(format!("unknown reason code: {s}")),
        }
    }
}

/// Which validation gate produced the terminal outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMethod {
    /// The evaluation terminated at the origin gate.
    OriginOnly,
    /// The origin gate passed; the identity gate produced the outcome.
    IdentityOnly,
    /// Both gates were exercised and passed.
    DualValidation,
    /// A dependency failure terminated the evaluation.
    SystemError,
}

impl AccessMethod {
    /// Derive the method from a finished decision.
    #[must_use]
    pub fn for_decision(decision: &AccessDecision) -> Self {
        match decision.reason {
            None => Self::DualValidation,
            Some(ReasonCode::OriginMissing | ReasonCode::OriginNotAllowed) => Self::OriginOnly,
            Some(
                ReasonCode::CredentialMissing
                | ReasonCode::CredentialInvalid
                | ReasonCode::CredentialMalformed,
            ) => Self::IdentityOnly,
            Some(ReasonCode::SystemError) => Self::SystemError,
        }
    }
}

impl std::fmt::Display for AccessMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OriginOnly => write!(f, "origin-only"),
            Self::IdentityOnly => write!(f, "identity-only"),
            Self::DualValidation => write!(f, "dual-validation"),
            Self::SystemError => write!(f, "system-error"),
        }
    }
}

/// Verified identity returned by the identity provider.
///
/// Exists only within the lifetime of one evaluation; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    /// Stable, opaque subject identifier.
    pub subject_id: String,
    /// Human-readable display name.
    pub display_name: String,
}

impl IdentityAssertion {
    /// Build an assertion.
    #[must_use]
    pub fn new(subject_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Immutable output of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Whether both gates passed.
    pub authorized: bool,

    /// Denial reason; absent on an authorized decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,

    /// Verified subject, present only when authorized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    /// Verified display name, present only when authorized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AccessDecision {
    /// A denial with the given reason.
    #[must_use]
    pub fn denied(reason: ReasonCode) -> Self {
        Self {
            authorized: false,
            reason: Some(reason),
            subject_id: None,
            display_name: None,
        }
    }

    /// An authorization carrying the verified identity.
    #[must_use]
    pub fn granted(assertion: IdentityAssertion) -> Self {
        Self {
            authorized: true,
            reason: None,
            subject_id: Some(assertion.subject_id),
            display_name: Some(assertion.display_name),
        }
    }
}
