//! HTTP userinfo-endpoint verifier.
//!
//! Presents the bearer credential to the provider's userinfo endpoint and
//! maps the response onto the verification taxonomy: a 2xx with subject
//! claims is a valid identity, 401/403 is a rejected token, and anything
//! else (timeouts, connection failures, 5xx, unparseable bodies) is
//! `ProviderUnavailable` so outages are never mistaken for attacker
//! behavior.

use std::time::Duration;

use hearthgate_core::{Credential, IdentityAssertion};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::UserinfoConfig;
use crate::error::VerificationError;
use crate::verifier::IdentityVerifier;

/// Claims returned by the userinfo endpoint.
#[derive(Debug, Deserialize)]
struct UserinfoClaims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
}

/// Identity verifier backed by an OIDC-style userinfo endpoint.
#[derive(Clone)]
pub struct UserinfoVerifier {
    client: Client,
    config: UserinfoConfig,
}

impl UserinfoVerifier {
    /// Build a verifier with a dedicated HTTP client whose timeout is the
    /// configured request budget.
    #[must_use]
    pub fn new(config: UserinfoConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Syntactic pre-check: non-empty and limited to the RFC 6750 b64token
    /// character set. Runs before any network call.
    fn check_syntax(credential: &Credential) -> Result<(), VerificationError> {
        if credential.is_empty() {
            return Err(VerificationError::Malformed("empty credential".into()));
        }

        let valid = credential.expose().chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '+' | '/' | '=')
        });
        if !valid {
            return Err(VerificationError::Malformed(
                "credential contains characters outside the bearer token grammar".into(),
            ));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for UserinfoVerifier {
    async fn verify(
        &self,
        credential: &Credential,
    ) -> Result<IdentityAssertion, VerificationError> {
        Self::check_syntax(credential)?;

        let response = self
            .client
            .get(self.config.userinfo_url.clone())
            .bearer_auth(credential.expose())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VerificationError::ProviderUnavailable("request timed out".into())
                } else {
                    VerificationError::ProviderUnavailable(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        match status {
            s if s.is_success() => {
                let claims: UserinfoClaims = response.json().await.map_err(|e| {
                    VerificationError::ProviderUnavailable(format!(
                        "unparseable userinfo response: {e}"
                    ))
                })?;

                debug!(subject = %claims.sub, "credential verified by provider");

                let display_name = claims.name.unwrap_or_else(|| claims.sub.clone());
                Ok(IdentityAssertion::new(claims.sub, display_name))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(VerificationError::Invalid(
                format!("provider returned {status}"),
            )),
            s if s.is_client_error() => Err(VerificationError::Invalid(format!(
                "provider returned {status}"
            ))),
            _ => Err(VerificationError::ProviderUnavailable(format!(
                "provider returned {status}"
            ))),
        }
    }
}
