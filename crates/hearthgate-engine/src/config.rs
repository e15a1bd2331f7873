use std::time::Duration;

use hearthgate_core::Scope;

/// Default identity-call time budget in seconds.
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 3;

/// Configuration for the access decision engine.
///
/// There is deliberately no fail-open switch: empty-allowlist and
/// dependency-failure outcomes always deny.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Allowlist scope consulted for every evaluation.
    pub scope: Scope,

    /// Hard deadline for the identity-provider call. Elapse is treated as a
    /// provider failure, never as an indefinite hang.
    pub verify_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scope: Scope::system(),
            verify_timeout: Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let scope = reader("HEARTHGATE_SCOPE")
            .map(Scope::new)
            .unwrap_or_else(|_| Scope::system());

        let verify_timeout_secs = reader("HEARTHGATE_VERIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_VERIFY_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue("HEARTHGATE_VERIFY_TIMEOUT_SECS".into(), e.to_string())
            })?;
        if verify_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "HEARTHGATE_VERIFY_TIMEOUT_SECS".into(),
                "timeout must be at least one second".into(),
            ));
        }

        Ok(Self {
            scope,
            verify_timeout: Duration::from_secs(verify_timeout_secs),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;

    /// Create a reader closure from a HashMap (no global env mutation).
    fn make_reader(vars: HashMap<&str, &str>) -> impl Fn(&str) -> Result<String, VarError> {
        let owned: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| owned.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_reader(make_reader(HashMap::new())).unwrap();
        assert_eq!(config.scope, Scope::system());
        assert_eq!(
            config.verify_timeout,
            Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_custom_values() {
        let reader = make_reader(HashMap::from([
            ("HEARTHGATE_SCOPE", "staging"),
            ("HEARTHGATE_VERIFY_TIMEOUT_SECS", "7"),
        ]));

        let config = EngineConfig::from_reader(reader).unwrap();
        assert_eq!(config.scope, Scope::new("staging"));
        assert_eq!(config.verify_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_invalid_timeout() {
        let reader = make_reader(HashMap::from([(
            "HEARTHGATE_VERIFY_TIMEOUT_SECS",
            "brief",
        )]));

        let err = EngineConfig::from_reader(reader).unwrap_err();
        assert!(err.to_string().contains("HEARTHGATE_VERIFY_TIMEOUT_SECS"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let reader = make_reader(HashMap::from([("HEARTHGATE_VERIFY_TIMEOUT_SECS", "0")]));
        assert!(EngineConfig::from_reader(reader).is_err());
    }
}
