/// Errors from audit sink appends.
///
/// Sink failures are degraded, never fatal: the decision path reports them
/// to operational telemetry and returns the decision regardless.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("audit sink closed")]
    SinkClosed,
}
