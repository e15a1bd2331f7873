//! End-to-end tests for the access decision engine against in-memory
//! collaborators.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use hearthgate_allowlist::{AllowlistError, AllowlistSnapshot, AllowlistStore, InMemoryAllowlistStore};
use hearthgate_audit::{AuditResult, AuditSink, FailingAuditSink, InMemoryAuditSink};
use hearthgate_core::{AccessMethod, AccessRequest, Credential, ReasonCode, Scope};
use hearthgate_identity::{IdentityVerifier, MockVerifier, VerificationError};
use hearthgate_engine::{AccessEngine, EngineConfig};

const ALLOWED_ORIGIN: &str = "203.0.113.5";
const OTHER_ORIGIN: &str = "198.51.100.9";
const TOKEN: &str = "opaque-bearer-token-abc123";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

struct Harness {
    engine: AccessEngine,
    verifier: Arc<MockVerifier>,
    sink: Arc<InMemoryAuditSink>,
}

async fn harness(verifier: MockVerifier, allowed: &[&str]) -> Harness {
    init_tracing();

    let store = Arc::new(InMemoryAllowlistStore::new());
    if !allowed.is_empty() {
        let entries: BTreeSet<String> = allowed.iter().map(ToString::to_string).collect();
        store.replace(&Scope::system(), entries).await.unwrap();
    }

    let verifier = Arc::new(verifier);
    let sink = Arc::new(InMemoryAuditSink::new());
    let engine = AccessEngine::new(
        Arc::clone(&store) as Arc<dyn AllowlistStore>,
        Arc::clone(&verifier) as Arc<dyn IdentityVerifier>,
        Arc::clone(&sink) as Arc<dyn AuditSink>,
        EngineConfig::default(),
    );

    Harness {
        engine,
        verifier,
        sink,
    }
}

fn authenticated_request(origin: &str) -> AccessRequest {
    AccessRequest::new(origin).with_credential(Credential::new(TOKEN))
}

#[tokio::test]
async fn allowed_origin_with_valid_credential_is_authorized() {
    let h = harness(MockVerifier::accepting("sub-1", "Alex"), &[ALLOWED_ORIGIN]).await;

    let decision = h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert!(decision.authorized);
    assert!(decision.reason.is_none());
    assert_eq!(decision.subject_id.as_deref(), Some("sub-1"));
    assert_eq!(decision.display_name.as_deref(), Some("Alex"));

    let records = h.sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].result, AuditResult::Success);
    assert_eq!(records[0].method, AccessMethod::DualValidation);
    assert_eq!(records[0].subject_id.as_deref(), Some("sub-1"));
}

#[tokio::test]
async fn unlisted_origin_is_denied_without_calling_verifier() {
    let h = harness(MockVerifier::accepting("sub-1", "Alex"), &[ALLOWED_ORIGIN]).await;

    let decision = h.engine.evaluate(authenticated_request(OTHER_ORIGIN)).await;

    assert!(!decision.authorized);
    assert_eq!(decision.reason, Some(ReasonCode::OriginNotAllowed));
    // Origin check precedes identity: the provider is never consulted.
    assert_eq!(h.verifier.calls(), 0);

    let records = h.sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].result, AuditResult::Failure);
    assert_eq!(records[0].method, AccessMethod::OriginOnly);
    assert_eq!(records[0].reason, Some(ReasonCode::OriginNotAllowed));
}

#[tokio::test]
async fn missing_credential_is_denied_after_origin_passes() {
    let h = harness(MockVerifier::accepting("sub-1", "Alex"), &[ALLOWED_ORIGIN]).await;

    let decision = h.engine.evaluate(AccessRequest::new(ALLOWED_ORIGIN)).await;

    assert!(!decision.authorized);
    assert_eq!(decision.reason, Some(ReasonCode::CredentialMissing));
    assert_eq!(h.verifier.calls(), 0);

    let records = h.sink.records().await;
    assert_eq!(records[0].method, AccessMethod::IdentityOnly);
}

#[tokio::test]
async fn rejected_credential_is_denied() {
    let h = harness(
        MockVerifier::rejecting(VerificationError::Invalid("token expired".into())),
        &[ALLOWED_ORIGIN],
    )
    .await;

    let decision = h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert!(!decision.authorized);
    assert_eq!(decision.reason, Some(ReasonCode::CredentialInvalid));
    assert_eq!(h.verifier.calls(), 1);
}

#[tokio::test]
async fn malformed_credential_is_denied_with_its_own_reason() {
    let h = harness(
        MockVerifier::rejecting(VerificationError::Malformed("not a token".into())),
        &[ALLOWED_ORIGIN],
    )
    .await;

    let decision = h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert_eq!(decision.reason, Some(ReasonCode::CredentialMalformed));
}

#[tokio::test]
async fn provider_outage_is_system_error_not_credential_invalid() {
    let h = harness(
        MockVerifier::rejecting(VerificationError::ProviderUnavailable(
            "connection refused".into(),
        )),
        &[ALLOWED_ORIGIN],
    )
    .await;

    let decision = h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert!(!decision.authorized);
    assert_eq!(decision.reason, Some(ReasonCode::SystemError));

    let records = h.sink.records().await;
    assert_eq!(records[0].method, AccessMethod::SystemError);
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_denies_and_still_audits() {
    let h = harness(
        MockVerifier::accepting("sub-1", "Alex").with_delay(Duration::from_secs(60)),
        &[ALLOWED_ORIGIN],
    )
    .await;

    let decision = h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert!(!decision.authorized);
    assert_eq!(decision.reason, Some(ReasonCode::SystemError));

    let records = h.sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].result, AuditResult::Failure);
    assert_eq!(records[0].reason, Some(ReasonCode::SystemError));
}

#[tokio::test]
async fn empty_origin_is_rejected_before_any_store_access() {
    let h = harness(MockVerifier::accepting("sub-1", "Alex"), &[ALLOWED_ORIGIN]).await;

    for origin in ["", "   "] {
        let decision = h
            .engine
            .evaluate(AccessRequest::new(origin).with_credential(Credential::new(TOKEN)))
            .await;
        assert_eq!(decision.reason, Some(ReasonCode::OriginMissing));
    }

    assert_eq!(h.verifier.calls(), 0);
    assert_eq!(h.sink.len().await, 2);
}

#[tokio::test]
async fn never_set_allowlist_denies_even_valid_credentials() {
    let h = harness(MockVerifier::accepting("sub-1", "Alex"), &[]).await;

    let decision = h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert!(!decision.authorized);
    assert_eq!(decision.reason, Some(ReasonCode::OriginNotAllowed));
    assert_eq!(h.verifier.calls(), 0);
}

#[tokio::test]
async fn cidr_entry_admits_the_whole_block() {
    let h = harness(MockVerifier::accepting("sub-1", "Alex"), &["198.51.100.0/24"]).await;

    let decision = h.engine.evaluate(authenticated_request("198.51.100.42")).await;
    assert!(decision.authorized);

    let decision = h.engine.evaluate(authenticated_request("198.51.101.42")).await;
    assert_eq!(decision.reason, Some(ReasonCode::OriginNotAllowed));
}

#[tokio::test]
async fn failing_allowlist_store_denies_fail_closed() {
    struct BrokenStore;

    #[async_trait::async_trait]
    impl AllowlistStore for BrokenStore {
        async fn get(&self, _scope: &Scope) -> Result<AllowlistSnapshot, AllowlistError> {
            Err(AllowlistError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn replace(
            &self,
            _scope: &Scope,
            _entries: BTreeSet<String>,
        ) -> Result<chrono::DateTime<chrono::Utc>, AllowlistError> {
            Err(AllowlistError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    init_tracing();
    let verifier = Arc::new(MockVerifier::accepting("sub-1", "Alex"));
    let sink = Arc::new(InMemoryAuditSink::new());
    let engine = AccessEngine::new(
        Arc::new(BrokenStore),
        Arc::clone(&verifier) as Arc<dyn IdentityVerifier>,
        Arc::clone(&sink) as Arc<dyn AuditSink>,
        EngineConfig::default(),
    );

    let decision = engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert!(!decision.authorized);
    assert_eq!(decision.reason, Some(ReasonCode::SystemError));
    assert_eq!(verifier.calls(), 0);

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, AccessMethod::SystemError);
}

#[tokio::test]
async fn audit_sink_failure_does_not_affect_the_decision() {
    init_tracing();
    let store = Arc::new(InMemoryAllowlistStore::new());
    let entries: BTreeSet<String> = [ALLOWED_ORIGIN.to_string()].into_iter().collect();
    store.replace(&Scope::system(), entries).await.unwrap();

    let engine = AccessEngine::new(
        store,
        Arc::new(MockVerifier::accepting("sub-1", "Alex")),
        Arc::new(FailingAuditSink),
        EngineConfig::default(),
    );

    let decision = engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    assert!(decision.authorized);
    assert_eq!(engine.audit_failures(), 1);
}

#[tokio::test]
async fn every_failure_record_carries_a_reason() {
    let h = harness(
        MockVerifier::rejecting(VerificationError::Invalid("expired".into())),
        &[ALLOWED_ORIGIN],
    )
    .await;

    h.engine.evaluate(AccessRequest::new("")).await;
    h.engine.evaluate(authenticated_request(OTHER_ORIGIN)).await;
    h.engine.evaluate(AccessRequest::new(ALLOWED_ORIGIN)).await;
    h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;

    let records = h.sink.records().await;
    assert_eq!(records.len(), 4);
    for record in &records {
        assert_eq!(record.result, AuditResult::Failure);
        assert!(record.reason.is_some(), "failure record without reason");
    }
}

#[tokio::test]
async fn no_audit_record_ever_contains_the_credential() {
    // Exercise every failure kind plus success with the same token and
    // search the serialized records for it.
    let scenarios: Vec<MockVerifier> = vec![
        MockVerifier::accepting("sub-1", "Alex"),
        MockVerifier::rejecting(VerificationError::Invalid("rejected".into())),
        MockVerifier::rejecting(VerificationError::Malformed("bad shape".into())),
        MockVerifier::rejecting(VerificationError::ProviderUnavailable("down".into())),
    ];

    for verifier in scenarios {
        let h = harness(verifier, &[ALLOWED_ORIGIN]).await;
        h.engine.evaluate(authenticated_request(ALLOWED_ORIGIN)).await;
        h.engine.evaluate(authenticated_request(OTHER_ORIGIN)).await;
        h.engine.evaluate(AccessRequest::new(ALLOWED_ORIGIN)).await;

        for record in h.sink.records().await {
            let json = serde_json::to_string(&record).unwrap();
            assert!(
                !json.contains(TOKEN),
                "credential leaked into audit record: {json}"
            );
        }
    }
}

#[tokio::test]
async fn parallel_evaluations_each_produce_one_record() {
    let h = harness(MockVerifier::accepting("sub-1", "Alex"), &[ALLOWED_ORIGIN]).await;
    let engine = Arc::new(h.engine);

    let mut tasks = Vec::new();
    for i in 0..32 {
        let engine = Arc::clone(&engine);
        let origin = if i % 2 == 0 { ALLOWED_ORIGIN } else { OTHER_ORIGIN };
        tasks.push(tokio::spawn(async move {
            engine.evaluate(authenticated_request(origin)).await
        }));
    }

    let mut granted = 0;
    for task in tasks {
        if task.await.unwrap().authorized {
            granted += 1;
        }
    }

    assert_eq!(granted, 16);
    assert_eq!(h.sink.len().await, 32);
    // Only allowed-origin evaluations reached the provider.
    assert_eq!(h.verifier.calls(), 16);
}
