//! Error types for the nutrition AI service.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::nutrition::NutritionResponse;
use crate::onboarding::OnboardingStep;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the upstream chat-completion gateway.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Provider {provider} usage quota exhausted")]
    QuotaExceeded { provider: String },

    #[error("Provider {provider} returned HTTP {status}")]
    UpstreamStatus { provider: String, status: u16 },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Provider {provider} returned no completion")]
    EmptyCompletion { provider: String },
}

/// Errors surfaced by the nutrition proxy endpoint.
///
/// The display strings are what the caller sees in the `error` field of the
/// response envelope.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI usage limit reached. Please add credits to continue.")]
    QuotaExceeded,

    #[error("AI gateway error: {0}")]
    Gateway(String),

    #[error("AI gateway timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("No response from AI")]
    EmptyCompletion,

    #[error("Could not parse AI response as JSON")]
    NoJsonObject,

    #[error("Invalid JSON in AI response: {0}")]
    MalformedJson(String),
}

impl ProxyError {
    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownAction(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Gateway(_)
            | Self::EmptyCompletion
            | Self::NoJsonObject
            | Self::MalformedJson(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether a caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout(_))
    }
}

impl From<LlmError> for ProxyError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited { .. } => Self::RateLimited,
            LlmError::QuotaExceeded { .. } => Self::QuotaExceeded,
            LlmError::UpstreamStatus { status, .. } => Self::Gateway(status.to_string()),
            LlmError::Timeout { timeout, .. } => Self::Timeout(timeout),
            LlmError::EmptyCompletion { .. } => Self::EmptyCompletion,
            LlmError::RequestFailed { reason, .. } | LlmError::InvalidResponse { reason, .. } => {
                Self::Gateway(reason)
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body =
            NutritionResponse::<serde_json::Value>::failure(self.to_string(), self.is_retryable());
        (status, Json(body)).into_response()
    }
}

/// Onboarding session errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Onboarding session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Cannot leave {step} yet: {reason}")]
    StepIncomplete { step: OnboardingStep, reason: String },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: OnboardingStep,
        to: OnboardingStep,
    },

    #[error("Action not available on {step}")]
    NotAvailable { step: OnboardingStep },

    #[error("Too many onboarding sessions (limit {limit})")]
    TooManySessions { limit: usize },
}

impl IntoResponse for OnboardingError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::StepIncomplete { .. }
            | Self::InvalidTransition { .. }
            | Self::NotAvailable { .. } => StatusCode::CONFLICT,
            Self::TooManySessions { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Errors seen by callers of the proxy through `NutritionClient`.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Nutrition AI request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}
