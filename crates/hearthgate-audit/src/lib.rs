//! Append-only audit trail for Hearthgate access decisions.
//!
//! Every access evaluation produces exactly one [`AuditRecord`], success or
//! failure. Records never contain the raw credential. Sinks are append-only
//! and interchangeable (in-memory for tests, a structured log stream, or
//! Postgres); [`BufferedSink`] decorates any of them with a bounded channel
//! and a background flush task so a slow or failing sink degrades to dropped
//! telemetry instead of blocking the decision path.

pub mod buffered;
pub mod error;
pub mod postgres;
pub mod record;
pub mod sink;

pub use buffered::BufferedSink;
pub use error::AuditError;
pub use postgres::PgAuditSink;
pub use record::{AuditRecord, AuditResult};
pub use sink::{AuditSink, FailingAuditSink, InMemoryAuditSink, TracingAuditSink};
