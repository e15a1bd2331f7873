//! Verifier contract and scripted test double.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hearthgate_core::{Credential, IdentityAssertion};

use crate::error::VerificationError;

/// Contract for delegated credential verification.
#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Ask the identity provider whether the credential is currently valid.
    ///
    /// Implementations must bound their own network time budget; callers
    /// additionally impose a hard deadline.
    async fn verify(
        &self,
        credential: &Credential,
    ) -> Result<IdentityAssertion, VerificationError>;
}

/// Scripted verifier for tests.
///
/// Returns a fixed outcome and counts invocations, so tests can assert the
/// verifier was never called on short-circuited paths. An optional delay
/// simulates a slow provider for timeout tests.
pub struct MockVerifier {
    outcome: Result<IdentityAssertion, VerificationError>,
    delay: Option<Duration>,
    calls: AtomicU64,
}

impl MockVerifier {
    /// A verifier that accepts every credential as the given subject.
    #[must_use]
    pub fn accepting(subject_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            outcome: Ok(IdentityAssertion::new(subject_id, display_name)),
            delay: None,
            calls: AtomicU64::new(0),
        }
    }

    /// A verifier that fails every call with the given error.
    #[must_use]
    pub fn rejecting(error: VerificationError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `verify` has been invoked.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for MockVerifier {
    async fn verify(
        &self,
        _credential: &Credential,
    ) -> Result<IdentityAssertion, VerificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}
