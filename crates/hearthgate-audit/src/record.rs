//! The audit record schema.

use chrono::{DateTime, Utc};
use hearthgate_core::{AccessDecision, AccessMethod, ReasonCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of an evaluation as recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    Success,
    Failure,
}

impl std::fmt::Display for AuditResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

impl std::str::FromStr for AuditResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            _ => Err(format!("unknown audit result: {s}")),
        }
    }
}

/// One append-only record per access evaluation.
///
/// Invariants: every failure record carries a reason code, and no field ever
/// contains the raw credential. Records are created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// When the evaluated request was received.
    pub timestamp: DateTime<Utc>,
    /// The caller's claimed network address.
    pub origin_address: String,
    /// Verified subject, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    /// Verified display name, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Which gate produced the terminal outcome.
    pub method: AccessMethod,
    /// Success or failure.
    pub result: AuditResult,
    /// Denial reason; always present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
}

impl AuditRecord {
    /// Build the record for a finished decision.
    #[must_use]
    pub fn for_decision(
        decision: &AccessDecision,
        origin_address: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            origin_address: origin_address.to_string(),
            subject_id: decision.subject_id.clone(),
            display_name: decision.display_name.clone(),
            method: AccessMethod::for_decision(decision),
            result: if decision.authorized {
                AuditResult::Success
            } else {
                AuditResult::Failure
            },
            reason: decision.reason,
        }
    }
}
