//! Postgres audit sink.
//!
//! Append-only: the core never updates or deletes records; retention is an
//! external operational concern.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE access_audit_log (
//!     id              UUID PRIMARY KEY,
//!     occurred_at     TIMESTAMPTZ NOT NULL,
//!     origin_address  TEXT NOT NULL,
//!     subject_id      TEXT,
//!     display_name    TEXT,
//!     method          TEXT NOT NULL,
//!     result          TEXT NOT NULL,
//!     reason          TEXT
//! );
//! ```

use sqlx::PgPool;

use crate::error::AuditError;
use crate::record::AuditRecord;
use crate::sink::AuditSink;

/// Audit sink writing to an append-only Postgres table.
#[derive(Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AuditSink for PgAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        sqlx::query(
            r"
            INSERT INTO access_audit_log
                (id, occurred_at, origin_address, subject_id, display_name,
                 method, result, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(record.id)
        .bind(record.timestamp)
        .bind(&record.origin_address)
        .bind(&record.subject_id)
        .bind(&record.display_name)
        .bind(record.method.to_string())
        .bind(record.result.to_string())
        .bind(record.reason.map(|r| r.to_string()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
