//! Configuration types.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::onboarding::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL};

/// Default chat-completions endpoint of the hosted gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Default model requested from the gateway.
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Bearer credential for the upstream gateway.
    pub api_key: SecretString,
    /// Chat-completions endpoint.
    pub gateway_url: String,
    /// Model identifier sent with every completion.
    pub model: String,
    /// Upper bound on a single upstream call.
    pub request_timeout: Duration,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// How long the simulated body scan takes.
    pub scan_duration: Duration,
    /// Idle time after which an onboarding session is dropped.
    pub session_ttl: Duration,
    /// Upper bound on live onboarding sessions.
    pub max_sessions: usize,
}

impl ProxyConfig {
    /// Build a config with defaults for everything except the credential.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(30),
            port: 8080,
            scan_duration: Duration::from_secs(3),
            session_ttl: DEFAULT_SESSION_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// A missing or blank `AI_GATEWAY_API_KEY` is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("AI_GATEWAY_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("AI_GATEWAY_API_KEY".to_string()))?;

        let mut config = Self::new(SecretString::from(api_key));

        if let Some(url) = lookup("AI_GATEWAY_URL") {
            config.gateway_url = url;
        }
        if let Some(model) = lookup("NUTRITION_AI_MODEL") {
            config.model = model;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "AI_GATEWAY_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(port) = parse_var::<u16, _>(&lookup, "NUTRITION_AI_PORT")? {
            config.port = port;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "NUTRITION_AI_SCAN_SECS")? {
            config.scan_duration = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "NUTRITION_AI_SESSION_TTL_SECS")? {
            config.session_ttl = Duration::from_secs(secs);
        }
        if let Some(max) = parse_var::<usize, _>(&lookup, "NUTRITION_AI_MAX_SESSIONS")? {
            config.max_sessions = max;
        }

        Ok(config)
    }

    /// Whether a non-empty credential is present.
    pub fn has_credential(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
