//! Postgres-backed allowlist store.
//!
//! One row per scope with a `TEXT[]` entries column, so a replace is a
//! single upsert statement and readers can never observe a half-written
//! set. Reads go through a small TTL cache that is invalidated on local
//! replace.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE origin_allowlist (
//!     scope       TEXT PRIMARY KEY,
//!     entries     TEXT[] NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use hearthgate_core::Scope;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::error::AllowlistError;
use crate::snapshot::{validate_entries, AllowlistSnapshot};
use crate::store::AllowlistStore;

/// Default read-cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Cached snapshot for one scope.
#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: AllowlistSnapshot,
    cached_at: Instant,
}

/// Read cache keyed by scope.
#[derive(Debug, Default)]
struct SnapshotCache {
    data: HashMap<Scope, CachedSnapshot>,
    ttl: Duration,
}

impl SnapshotCache {
    fn new(ttl_secs: u64) -> Self {
        Self {
            data: HashMap::new(),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn get(&self, scope: &Scope) -> Option<&CachedSnapshot> {
        self.data
            .get(scope)
            .filter(|c| c.cached_at.elapsed() < self.ttl)
    }

    fn set(&mut self, scope: Scope, snapshot: AllowlistSnapshot) {
        self.data.insert(
            scope,
            CachedSnapshot {
                snapshot,
                cached_at: Instant::now(),
            },
        );
    }

    fn invalidate(&mut self, scope: &Scope) {
        self.data.remove(scope);
    }
}

/// Postgres allowlist store.
#[derive(Clone)]
pub struct PgAllowlistStore {
    pool: PgPool,
    cache: Arc<RwLock<SnapshotCache>>,
}

impl PgAllowlistStore {
    /// Create a store with the default cache TTL.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_cache_ttl(pool, DEFAULT_CACHE_TTL_SECS)
    }

    /// Create a store with a custom cache TTL. A TTL of zero disables
    /// caching.
    #[must_use]
    pub fn with_cache_ttl(pool: PgPool, ttl_secs: u64) -> Self {
        Self {
            pool,
            cache: Arc::new(RwLock::new(SnapshotCache::new(ttl_secs))),
        }
    }

    async fn fetch(&self, scope: &Scope) -> Result<AllowlistSnapshot, AllowlistError> {
        let row = sqlx::query_as::<_, (Vec<String>, DateTime<Utc>)>(
            r"
            SELECT entries, updated_at
            FROM origin_allowlist
            WHERE scope = $1
            ",
        )
        .bind(scope.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some((entries, updated_at)) => {
                AllowlistSnapshot::new(entries.into_iter().collect(), updated_at)
            }
            None => AllowlistSnapshot::unset(),
        })
    }
}

#[async_trait::async_trait]
impl AllowlistStore for PgAllowlistStore {
    async fn get(&self, scope: &Scope) -> Result<AllowlistSnapshot, AllowlistError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(scope) {
                return Ok(cached.snapshot.clone());
            }
        }

        let snapshot = self.fetch(scope).await?;

        {
            let mut cache = self.cache.write().await;
            cache.set(scope.clone(), snapshot.clone());
        }

        Ok(snapshot)
    }

    async fn replace(
        &self,
        scope: &Scope,
        entries: BTreeSet<String>,
    ) -> Result<DateTime<Utc>, AllowlistError> {
        validate_entries(&entries)?;

        let entries: Vec<String> = entries.into_iter().collect();
        let (updated_at,) = sqlx::query_as::<_, (DateTime<Utc>,)>(
            r"
            INSERT INTO origin_allowlist (scope, entries, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (scope)
            DO UPDATE SET entries = EXCLUDED.entries, updated_at = now()
            RETURNING updated_at
            ",
        )
        .bind(scope.as_str())
        .bind(entries)
        .fetch_one(&self.pool)
        .await?;

        let mut cache = self.cache.write().await;
        cache.invalidate(scope);

        Ok(updated_at)
    }
}
