use url::Url;

/// Default HTTP timeout for userinfo calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration for the userinfo-endpoint verifier.
#[derive(Debug, Clone)]
pub struct UserinfoConfig {
    /// The provider's userinfo endpoint. HTTPS is required.
    pub userinfo_url: Url,

    /// Hard timeout for each provider call.
    pub request_timeout_secs: u64,
}

impl UserinfoConfig {
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
        let raw_url = reader("HEARTHGATE_USERINFO_URL")
            .map_err(|_| ConfigError::MissingVar("HEARTHGATE_USERINFO_URL".into()))?;
        let userinfo_url = Self::parse_endpoint(&raw_url)?;

        let request_timeout_secs = reader("HEARTHGATE_USERINFO_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue("HEARTHGATE_USERINFO_TIMEOUT_SECS".into(), e.to_string())
            })?;

        Ok(Self {
            userinfo_url,
            request_timeout_secs,
        })
    }

    /// Parse and validate the endpoint URL. Only HTTPS endpoints are
    /// accepted; the bearer credential travels in a header on every call.
    pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidValue("HEARTHGATE_USERINFO_URL".into(), e.to_string()))?;

        if url.scheme() != "https" {
            return Err(ConfigError::InvalidValue(
                "HEARTHGATE_USERINFO_URL".into(),
                "endpoint must use HTTPS".into(),
            ));
        }

        Ok(url)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
