//! Buffered sink decorator.
//!
//! Wraps any [`AuditSink`] behind a bounded mpsc channel drained by a
//! background task, so the decision path never waits on a slow or failing
//! sink. A full channel or an inner-sink failure drops the record and
//! increments a counter surfaced for operational telemetry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::AuditError;
use crate::record::AuditRecord;
use crate::sink::AuditSink;

/// Default channel capacity.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Channel-backed, best-effort audit sink.
pub struct BufferedSink {
    tx: mpsc::Sender<AuditRecord>,
    dropped: Arc<AtomicU64>,
}

impl BufferedSink {
    /// Wrap a sink with the default buffer capacity.
    #[must_use]
    pub fn new(inner: Arc<dyn AuditSink>) -> Self {
        Self::with_capacity(inner, DEFAULT_BUFFER_CAPACITY)
    }

    /// Wrap a sink with an explicit buffer capacity and spawn the background
    /// drain task.
    #[must_use]
    pub fn with_capacity(inner: Arc<dyn AuditSink>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let dropped = Arc::new(AtomicU64::new(0));
        tokio::spawn(drain_loop(inner, rx, Arc::clone(&dropped)));
        Self { tx, dropped }
    }

    /// Number of records dropped because the buffer was full or the inner
    /// sink failed.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl AuditSink for BufferedSink {
    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        // Non-blocking enqueue; a saturated buffer sheds load rather than
        // stalling the decision path.
        if let Err(e) = self.tx.try_send(record) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "audit buffer full, record dropped");
        }
        Ok(())
    }
}

/// Background loop appending buffered records to the inner sink.
async fn drain_loop(
    inner: Arc<dyn AuditSink>,
    mut rx: mpsc::Receiver<AuditRecord>,
    dropped: Arc<AtomicU64>,
) {
    while let Some(record) = rx.recv().await {
        let record_id = record.id;
        if let Err(e) = inner.append(record).await {
            dropped.fetch_add(1, Ordering::Relaxed);
            warn!(record_id = %record_id, error = %e, "audit sink append failed");
        }
    }
}
