//! LLM integration for the nutrition proxy.
//!
//! A single backend is supported: an OpenAI-compatible chat-completions
//! gateway reached directly over reqwest. `LlmProvider` is the seam the proxy
//! service depends on, so tests can substitute a stub.

pub mod gateway;
pub mod provider;

pub use gateway::GatewayProvider;
pub use provider::*;

use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::error::ConfigError;

/// Create the gateway provider from configuration.
///
/// Fails before any network activity when the credential is missing.
pub fn create_provider(config: &ProxyConfig) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    if !config.has_credential() {
        return Err(ConfigError::MissingEnvVar("AI_GATEWAY_API_KEY".to_string()));
    }

    let provider = GatewayProvider::new(&config.gateway_url, config.api_key.clone(), &config.model)
        .with_timeout(config.request_timeout);
    tracing::info!(model = %config.model, endpoint = %config.gateway_url, "Using AI gateway");
    Ok(Arc::new(provider))
}
