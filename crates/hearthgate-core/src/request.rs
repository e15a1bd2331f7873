//! Per-request evaluation input.

use chrono::{DateTime, Utc};

use crate::credential::Credential;

/// One inbound access attempt, constructed per call and consumed by the
/// decision engine.
#[derive(Debug, Clone)]
pub struct AccessRequest {
    /// The caller's claimed network address.
    pub origin_address: String,

    /// Bearer credential, if one was supplied.
    pub credential: Option<Credential>,

    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl AccessRequest {
    /// Create a request with no credential, stamped with the current time.
    #[must_use]
    pub fn new(origin_address: impl Into<String>) -> Self {
        Self {
            origin_address: origin_address.into(),
            credential: None,
            request_time: Utc::now(),
        }
    }

    /// Attach a bearer credential.
    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Override the receipt timestamp (for deterministic tests).
    #[must_use]
    pub fn at(mut self, request_time: DateTime<Utc>) -> Self {
        self.request_time = request_time;
        self
    }
}
