//! Allowlist store contract and in-memory implementation.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use hearthgate_core::Scope;
use tokio::sync::RwLock;

use crate::error::AllowlistError;
use crate::snapshot::{validate_entries, AllowlistSnapshot};

/// Persistence contract for per-scope origin allowlists.
///
/// `replace` is atomic with respect to concurrent `get` calls: readers
/// observe either the old set or the new set in full, never a mixture.
/// The store does not log decision context; that belongs to its callers.
#[async_trait::async_trait]
pub trait AllowlistStore: Send + Sync {
    /// Current snapshot for a scope. A scope that has never been set reads
    /// as an empty snapshot with no `updated_at`.
    async fn get(&self, scope: &Scope) -> Result<AllowlistSnapshot, AllowlistError>;

    /// Atomically overwrite the stored set, returning the new `updated_at`.
    ///
    /// Rejects sets containing malformed entries before any write. Concurrent
    /// replaces serialize per scope; last writer wins.
    async fn replace(
        &self,
        scope: &Scope,
        entries: BTreeSet<String>,
    ) -> Result<DateTime<Utc>, AllowlistError>;
}

/// In-memory allowlist store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryAllowlistStore {
    scopes: RwLock<HashMap<Scope, AllowlistSnapshot>>,
}

impl InMemoryAllowlistStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AllowlistStore for InMemoryAllowlistStore {
    async fn get(&self, scope: &Scope) -> Result<AllowlistSnapshot, AllowlistError> {
        let scopes = self.scopes.read().await;
        Ok(scopes.get(scope).cloned().unwrap_or_default())
    }

    async fn replace(
        &self,
        scope: &Scope,
        entries: BTreeSet<String>,
    ) -> Result<DateTime<Utc>, AllowlistError> {
        validate_entries(&entries)?;

        let updated_at = Utc::now();
        let mut scopes = self.scopes.write().await;
        scopes.insert(
            scope.clone(),
            AllowlistSnapshot::new(entries, updated_at),
        );
        Ok(updated_at)
    }
}
