//! OpenAI-compatible chat-completions gateway over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

use super::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
};

const PROVIDER: &str = "gateway";

/// Longest slice of an upstream error body that ends up in logs.
const ERROR_BODY_LOG_LIMIT: usize = 500;

/// Wire body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Chat-completions client for a hosted gateway with bearer auth.
pub struct GatewayProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    model: String,
    timeout: Duration,
}

impl GatewayProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: SecretString,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Bound every upstream call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = retry_after(resp.headers());
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %truncate(&text, ERROR_BODY_LOG_LIMIT),
                "AI gateway returned an error"
            );
            return Err(map_status(status, retry_after));
        }

        let text = resp.text().await.map_err(|e| LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: e.to_string(),
        })?;
        let reply: ChatCompletionReply =
            serde_json::from_str(&text).map_err(|e| LlmError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let first = reply.choices.into_iter().next();
        let finish_reason = FinishReason::from_wire(
            first.as_ref().and_then(|c| c.finish_reason.as_deref()),
        );
        let content = first
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::EmptyCompletion {
                provider: PROVIDER.to_string(),
            })?;

        let (input_tokens, output_tokens) = reply
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            input_tokens,
            output_tokens,
            finish_reason,
        })
    }
}

#[async_trait]
impl LlmProvider for GatewayProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        match tokio::time::timeout(self.timeout, self.send(&request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                provider: PROVIDER.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

fn map_status(status: StatusCode, retry_after: Option<Duration>) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider: PROVIDER.to_string(),
            retry_after,
        },
        StatusCode::PAYMENT_REQUIRED => LlmError::QuotaExceeded {
            provider: PROVIDER.to_string(),
        },
        other => LlmError::UpstreamStatus {
            provider: PROVIDER.to_string(),
            status: other.as_u16(),
        },
    }
}

fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_rate_limited() {
        let err = map_status(StatusCode::TOO_MANY_REQUESTS, Some(Duration::from_secs(7)));
        assert!(matches!(
            err,
            LlmError::RateLimited { retry_after: Some(d), .. } if d == Duration::from_secs(7)
        ));
    }

    #[test]
    fn status_402_is_quota() {
        assert!(matches!(
            map_status(StatusCode::PAYMENT_REQUIRED, None),
            LlmError::QuotaExceeded { .. }
        ));
    }

    #[test]
    fn other_statuses_keep_code() {
        assert!(matches!(
            map_status(StatusCode::SERVICE_UNAVAILABLE, None),
            LlmError::UpstreamStatus { status: 503, .. }
        ));
    }

    #[test]
    fn body_serializes_wire_shape() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hello")];
        let body = ChatCompletionBody {
            model: "m",
            messages: &messages,
            temperature: Some(0.7),
            max_tokens: Some(2000),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 2000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
