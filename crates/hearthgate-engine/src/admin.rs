//! Allowlist administration surface.
//!
//! Administration endpoints are privileged: every call is evaluated through
//! the decision engine before touching the store, so the same dual
//! validation gates reads and writes. The engine's own audit record covers
//! the access decision; administration adds structured operational logs
//! only.
//!
//! The one exception is [`bootstrap_allowlist`], the trusted-initialization
//! path used once at provisioning time — before any allowlist exists, no
//! request could pass the origin gate, so the first set is written directly.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearthgate_allowlist::{AllowlistError, AllowlistSnapshot, AllowlistStore};
use hearthgate_core::{AccessRequest, ReasonCode, Scope};
use tracing::{info, warn};

use crate::engine::AccessEngine;

/// Errors from allowlist administration.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("access denied: {reason}")]
    AccessDenied { reason: ReasonCode },

    #[error("allowlist already initialized")]
    AlreadyInitialized,

    #[error(transparent)]
    Store(#[from] AllowlistError),
}

impl AdminError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AccessDenied { .. } => "access_denied",
            Self::AlreadyInitialized => "already_initialized",
            Self::Store(e) => e.error_code(),
        }
    }
}

/// CRUD surface over the allowlist store, gated through the engine.
pub struct AllowlistAdmin {
    engine: Arc<AccessEngine>,
    store: Arc<dyn AllowlistStore>,
    scope: Scope,
}

impl AllowlistAdmin {
    /// Build the administration surface over an already-built engine.
    #[must_use]
    pub fn new(engine: Arc<AccessEngine>, store: Arc<dyn AllowlistStore>, scope: Scope) -> Self {
        Self {
            engine,
            store,
            scope,
        }
    }

    /// Read the current allowlist. Requires dual validation.
    pub async fn get_allowlist(
        &self,
        request: AccessRequest,
    ) -> Result<AllowlistSnapshot, AdminError> {
        self.authorize(request).await?;
        Ok(self.store.get(&self.scope).await?)
    }

    /// Atomically replace the allowlist. Requires dual validation.
    pub async fn set_allowlist(
        &self,
        request: AccessRequest,
        entries: BTreeSet<String>,
    ) -> Result<DateTime<Utc>, AdminError> {
        let origin = request.origin_address.clone();
        self.authorize(request).await?;

        let updated_at = self.store.replace(&self.scope, entries).await?;
        info!(
            scope = %self.scope,
            origin = %origin,
            updated_at = %updated_at,
            "allowlist replaced"
        );
        Ok(updated_at)
    }

    async fn authorize(&self, request: AccessRequest) -> Result<(), AdminError> {
        let origin = request.origin_address.clone();
        let decision = self.engine.evaluate(request).await;
        if decision.authorized {
            return Ok(());
        }

        let reason = decision.reason.unwrap_or(ReasonCode::SystemError);
        warn!(origin = %origin, reason = %reason, "administration call denied");
        Err(AdminError::AccessDenied { reason })
    }
}

/// One-time trusted-initialization path: seed the allowlist at provisioning
/// time, bypassing the engine. Fails once any set has been stored.
pub async fn bootstrap_allowlist(
    store: &dyn AllowlistStore,
    scope: &Scope,
    entries: BTreeSet<String>,
) -> Result<DateTime<Utc>, AdminError> {
    let current = store.get(scope).await?;
    if current.updated_at.is_some() {
        return Err(AdminError::AlreadyInitialized);
    }

    let updated_at = store.replace(scope, entries).await?;
    info!(scope = %scope, updated_at = %updated_at, "allowlist bootstrapped");
    Ok(updated_at)
}
