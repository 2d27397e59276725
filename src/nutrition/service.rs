//! The nutrition proxy: one request in, one upstream completion, one JSON
//! object out.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::extract::first_json_object;
use super::model::{NutritionRequest, NutritionRequestBody};
use super::prompts::build_user_message;
use crate::error::ProxyError;
use crate::llm::{ChatMessage, CompletionRequest, FinishReason, LlmProvider};

/// Sampling temperature for every nutrition completion.
pub const TEMPERATURE: f32 = 0.7;
/// Completion token cap for every nutrition completion.
pub const MAX_TOKENS: u32 = 2000;

/// Stateless proxy between callers and the chat-completion gateway.
pub struct NutritionAi {
    llm: Arc<dyn LlmProvider>,
}

impl NutritionAi {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Model name requests are sent with.
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Validate a wire body and handle it.
    ///
    /// Unknown actions and missing profiles are rejected before any upstream
    /// call is made.
    pub async fn handle_body(&self, body: NutritionRequestBody) -> Result<Value, ProxyError> {
        let request = NutritionRequest::try_from(body)?;
        self.handle(request).await
    }

    /// Run one completion for `request` and return the extracted JSON object.
    pub async fn handle(&self, request: NutritionRequest) -> Result<Value, ProxyError> {
        let action = request.action;
        let started = Instant::now();

        let completion = build_completion(&request);
        let response = match self.llm.complete(completion).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%action, error = %e, "Nutrition AI completion failed");
                return Err(e.into());
            }
        };

        let data = parse_completion(&response.content).inspect_err(|e| {
            if response.finish_reason == FinishReason::Length {
                tracing::warn!(
                    %action,
                    error = %e,
                    output_tokens = response.output_tokens,
                    max_tokens = MAX_TOKENS,
                    "Nutrition AI completion truncated at the token limit"
                );
            } else {
                tracing::warn!(%action, error = %e, "Unusable nutrition AI completion");
            }
        })?;

        tracing::info!(
            %action,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            latency_ms = started.elapsed().as_millis() as u64,
            "Nutrition AI request completed"
        );
        Ok(data)
    }
}

/// Build the two-message completion request for `request`.
pub fn build_completion(request: &NutritionRequest) -> CompletionRequest {
    CompletionRequest::new(vec![
        ChatMessage::system(request.action.system_prompt()),
        ChatMessage::user(build_user_message(request)),
    ])
    .with_temperature(TEMPERATURE)
    .with_max_tokens(MAX_TOKENS)
}

/// Extract and parse the first JSON object in a completion.
pub fn parse_completion(content: &str) -> Result<Value, ProxyError> {
    if content.trim().is_empty() {
        return Err(ProxyError::EmptyCompletion);
    }
    let raw = first_json_object(content).ok_or(ProxyError::NoJsonObject)?;
    serde_json::from_str(raw).map_err(|e| ProxyError::MalformedJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::LlmError;
    use crate::llm::{CompletionResponse, Role};
    use crate::nutrition::{DietType, Goal, NutritionAction, UserProfile};

    /// Stub that replays a fixed outcome and records what it was sent.
    struct StubLlm {
        reply: Mutex<Option<Result<String, LlmError>>>,
        finish_reason: FinishReason,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl StubLlm {
        fn replying(content: &str) -> Self {
            Self::with(Ok(content.to_string()))
        }

        fn with(reply: Result<String, LlmError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                finish_reason: FinishReason::Stop,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn truncated(content: &str) -> Self {
            Self {
                finish_reason: FinishReason::Length,
                ..Self::replying(content)
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            let content = self
                .reply
                .lock()
                .unwrap()
                .take()
                .expect("stub called more than once")?;
            Ok(CompletionResponse {
                content,
                input_tokens: 10,
                output_tokens: 20,
                finish_reason: self.finish_reason,
            })
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            goal: Goal::LoseFat,
            diet_type: DietType::Omnivore,
            protein_target: 154.0,
            carbs_target: 160.0,
            fats_target: 47.0,
            calories_target: 1680.0,
        }
    }

    fn body(action: &str) -> NutritionRequestBody {
        serde_json::from_value(json!({
            "action": action,
            "userProfile": profile(),
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn returns_extracted_object_verbatim() {
        let stub = Arc::new(StubLlm::replying(
            "Sure! ```json\n{\"score\": 72, \"insights\": [], \"extra\": {\"kept\": true}}\n```",
        ));
        let ai = NutritionAi::new(stub.clone());

        let data = ai.handle_body(body("analyze-macros")).await.unwrap();
        assert_eq!(
            data,
            json!({"score": 72, "insights": [], "extra": {"kept": true}})
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sends_system_prompt_and_sampling_params() {
        let stub = Arc::new(StubLlm::replying("{}"));
        let ai = NutritionAi::new(stub.clone());
        ai.handle_body(body("create-meal-plan")).await.unwrap();

        let sent = stub.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.messages.len(), 2);
        assert_eq!(sent.messages[0].role, Role::System);
        assert_eq!(
            sent.messages[0].content,
            NutritionAction::CreateMealPlan.system_prompt()
        );
        assert_eq!(sent.messages[1].role, Role::User);
        assert!(sent.messages[1].content.starts_with("User Profile:\n- Goal: lose-fat"));
        assert_eq!(sent.temperature, Some(TEMPERATURE));
        assert_eq!(sent.max_tokens, Some(MAX_TOKENS));
    }

    #[tokio::test]
    async fn unknown_action_makes_no_upstream_call() {
        let stub = Arc::new(StubLlm::replying("{}"));
        let ai = NutritionAi::new(stub.clone());

        let err = ai.handle_body(body("order-pizza")).await.unwrap_err();
        assert!(matches!(err, ProxyError::UnknownAction(ref a) if a == "order-pizza"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_errors_are_mapped() {
        let stub = Arc::new(StubLlm::with(Err(LlmError::QuotaExceeded {
            provider: "stub".into(),
        })));
        let ai = NutritionAi::new(stub);
        let err = ai.handle_body(body("suggest-meals")).await.unwrap_err();
        assert!(matches!(err, ProxyError::QuotaExceeded));
    }

    #[tokio::test]
    async fn prose_only_completion_is_rejected() {
        let stub = Arc::new(StubLlm::replying("I cannot help with that."));
        let ai = NutritionAi::new(stub);
        let err = ai.handle_body(body("suggest-meals")).await.unwrap_err();
        assert!(matches!(err, ProxyError::NoJsonObject));
        assert_eq!(err.to_string(), "Could not parse AI response as JSON");
    }

    #[tokio::test]
    async fn truncated_completion_has_no_object() {
        let stub = Arc::new(StubLlm::truncated("```json\n{\"meals\": [{\"name\": \"Oat"));
        let ai = NutritionAi::new(stub);
        let err = ai.handle_body(body("suggest-meals")).await.unwrap_err();
        assert!(matches!(err, ProxyError::NoJsonObject));
    }

    #[tokio::test]
    async fn truncation_does_not_affect_a_complete_object() {
        let stub = Arc::new(StubLlm::truncated("{\"meals\": []} and then some"));
        let ai = NutritionAi::new(stub);
        let data = ai.handle_body(body("suggest-meals")).await.unwrap();
        assert_eq!(data, json!({"meals": []}));
    }

    #[test]
    fn parse_completion_cases() {
        assert!(matches!(parse_completion("   "), Err(ProxyError::EmptyCompletion)));
        assert!(matches!(parse_completion("no json"), Err(ProxyError::NoJsonObject)));
        assert!(matches!(
            parse_completion("{\"a\": 1,}"),
            Err(ProxyError::MalformedJson(_))
        ));
        assert_eq!(parse_completion("x {\"a\": [1]} y").unwrap(), json!({"a": [1]}));
    }
}
