//! The access decision engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hearthgate_allowlist::AllowlistStore;
use hearthgate_audit::{AuditRecord, AuditSink};
use hearthgate_core::{AccessDecision, AccessRequest, ReasonCode};
use hearthgate_identity::{IdentityVerifier, VerificationError};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;

/// Orchestrates the two gates per request and renders a verdict.
///
/// `evaluate` is infallible: every path produces a decision, and exactly one
/// audit record is emitted before the decision is returned. Gate order is
/// fixed — origin first, then identity — so provider calls are never spent
/// on traffic that would be rejected anyway, and an origin failure is never
/// masked by a credential outcome.
pub struct AccessEngine {
    allowlist: Arc<dyn AllowlistStore>,
    verifier: Arc<dyn IdentityVerifier>,
    audit: Arc<dyn AuditSink>,
    config: EngineConfig,
    audit_failures: AtomicU64,
}

impl AccessEngine {
    /// Build an engine from its injected collaborators.
    #[must_use]
    pub fn new(
        allowlist: Arc<dyn AllowlistStore>,
        verifier: Arc<dyn IdentityVerifier>,
        audit: Arc<dyn AuditSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            allowlist,
            verifier,
            audit,
            config,
            audit_failures: AtomicU64::new(0),
        }
    }

    /// Evaluate one access request.
    ///
    /// Authorizes iff the origin is an allowlist member AND the credential
    /// verifies, in that order. All missing-data and dependency-failure
    /// paths deny.
    pub async fn evaluate(&self, request: AccessRequest) -> AccessDecision {
        let decision = self.decide(&request).await;
        self.emit_audit(&request, &decision).await;
        decision
    }

    /// Number of evaluations whose audit append failed (operational
    /// telemetry; the decisions themselves were unaffected).
    #[must_use]
    pub fn audit_failures(&self) -> u64 {
        self.audit_failures.load(Ordering::Relaxed)
    }

    async fn decide(&self, request: &AccessRequest) -> AccessDecision {
        // Malformed request, not a security decision: short-circuits before
        // any store access.
        if request.origin_address.trim().is_empty() {
            info!(reason = %ReasonCode::OriginMissing, "request carried no origin address");
            return AccessDecision::denied(ReasonCode::OriginMissing);
        }

        // Gate one: origin allowlist. A store failure denies fail-closed.
        let snapshot = match self.allowlist.get(&self.config.scope).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, scope = %self.config.scope, "allowlist store unavailable");
                return AccessDecision::denied(ReasonCode::SystemError);
            }
        };

        if !snapshot.contains(&request.origin_address) {
            info!(
                origin = %request.origin_address,
                reason = %ReasonCode::OriginNotAllowed,
                "origin not in allowlist"
            );
            return AccessDecision::denied(ReasonCode::OriginNotAllowed);
        }

        // Gate two: identity credential.
        let Some(credential) = &request.credential else {
            info!(
                origin = %request.origin_address,
                reason = %ReasonCode::CredentialMissing,
                "no credential supplied"
            );
            return AccessDecision::denied(ReasonCode::CredentialMissing);
        };

        match timeout(self.config.verify_timeout, self.verifier.verify(credential)).await {
            Err(_elapsed) => {
                error!(
                    origin = %request.origin_address,
                    budget_secs = self.config.verify_timeout.as_secs(),
                    "identity provider call exceeded time budget"
                );
                AccessDecision::denied(ReasonCode::SystemError)
            }
            Ok(Err(VerificationError::ProviderUnavailable(cause))) => {
                error!(origin = %request.origin_address, cause = %cause, "identity provider unavailable");
                AccessDecision::denied(ReasonCode::SystemError)
            }
            Ok(Err(VerificationError::Invalid(cause))) => {
                info!(
                    origin = %request.origin_address,
                    cause = %cause,
                    reason = %ReasonCode::CredentialInvalid,
                    "credential rejected by provider"
                );
                AccessDecision::denied(ReasonCode::CredentialInvalid)
            }
            Ok(Err(VerificationError::Malformed(cause))) => {
                info!(
                    origin = %request.origin_address,
                    cause = %cause,
                    reason = %ReasonCode::CredentialMalformed,
                    "credential is malformed"
                );
                AccessDecision::denied(ReasonCode::CredentialMalformed)
            }
            Ok(Ok(assertion)) => {
                debug!(
                    origin = %request.origin_address,
                    subject_id = %assertion.subject_id,
                    "dual validation passed"
                );
                AccessDecision::granted(assertion)
            }
        }
    }

    /// Emit the audit record for a finished decision. A sink failure is
    /// counted and logged, never propagated: the decision is returned
    /// first-class regardless.
    async fn emit_audit(&self, request: &AccessRequest, decision: &AccessDecision) {
        let record =
            AuditRecord::for_decision(decision, &request.origin_address, request.request_time);

        if let Err(e) = self.audit.append(record).await {
            self.audit_failures.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "audit append failed; decision unaffected");
        }
    }
}
