//! Audit sink contract and the in-memory / log-stream implementations.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::AuditError;
use crate::record::AuditRecord;

/// Append-only destination for audit records. No read API is required by
/// the decision path; `InMemoryAuditSink` exposes one for tests.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError>;
}

/// In-memory audit sink for testing.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records appended so far, oldest first.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }

    /// Number of records appended so far.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no record has been appended.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        self.records.write().await.push(record);
        Ok(())
    }
}

/// Sink that emits each record as a structured tracing event, for
/// deployments whose audit trail is a log stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        let reason = record.reason.map(|r| r.to_string());
        info!(
            target: "hearthgate::audit",
            record_id = %record.id,
            origin = %record.origin_address,
            subject_id = record.subject_id.as_deref(),
            method = %record.method,
            result = %record.result,
            reason = reason.as_deref(),
            "access evaluated"
        );
        Ok(())
    }
}

/// Sink that fails every append, for exercising degraded paths in tests.
#[derive(Debug, Default)]
pub struct FailingAuditSink;

#[async_trait::async_trait]
impl AuditSink for FailingAuditSink {
    async fn append(&self, _record: AuditRecord) -> Result<(), AuditError> {
        Err(AuditError::SinkClosed)
    }
}
