//! Typed client for the `/nutrition-ai` endpoint.
//!
//! Every failure, whether transport, an error envelope or data that does not
//! match the action's schema, comes back as a [`ClientError`]. Callers keep
//! their previous state on error.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::error::ClientError;
use crate::nutrition::{
    ActionSchema, DailyMealPlan, MacroAmounts, MacroAnalysis, MealOptimization, MealType,
    NutritionRequest, NutritionResponse, SuggestedMeals, UserProfile,
};

pub struct NutritionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl NutritionClient {
    /// Client for a server rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/nutrition-ai", base_url.trim_end_matches('/')),
            api_key: None,
        }
    }

    /// Send `key` as both a bearer token and an `apikey` header.
    pub fn with_api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn suggest_meals(
        &self,
        profile: &UserProfile,
        meal_type: Option<MealType>,
        preferences: Option<&str>,
    ) -> Result<SuggestedMeals, ClientError> {
        let mut request = request_for::<SuggestedMeals>(profile);
        request.meal_type = meal_type;
        request.preferences = preferences.map(str::to_string);
        self.send_typed(&request).await
    }

    pub async fn optimize_meal(
        &self,
        profile: &UserProfile,
        current: MacroAmounts,
    ) -> Result<MealOptimization, ClientError> {
        let request = request_for::<MealOptimization>(profile).with_current_macros(current);
        self.send_typed(&request).await
    }

    pub async fn analyze_macros(
        &self,
        profile: &UserProfile,
        current: MacroAmounts,
    ) -> Result<MacroAnalysis, ClientError> {
        let request = request_for::<MacroAnalysis>(profile).with_current_macros(current);
        self.send_typed(&request).await
    }

    pub async fn create_meal_plan(
        &self,
        profile: &UserProfile,
        preferences: Option<&str>,
    ) -> Result<DailyMealPlan, ClientError> {
        let mut request = request_for::<DailyMealPlan>(profile);
        request.preferences = preferences.map(str::to_string);
        self.send_typed(&request).await
    }

    /// Send any request and return `data` untyped.
    pub async fn send(&self, request: &NutritionRequest) -> Result<Value, ClientError> {
        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder
                .bearer_auth(key.expose_secret())
                .header("apikey", key.expose_secret());
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        let envelope: NutritionResponse<Value> = match serde_json::from_str(&text) {
            Ok(e) => e,
            Err(e) if status.is_success() => return Err(ClientError::Decode(e.to_string())),
            Err(_) => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: text,
                });
            }
        };

        if !envelope.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.error.unwrap_or_default(),
            });
        }
        envelope
            .data
            .ok_or_else(|| ClientError::Decode("success envelope without data".to_string()))
    }

    async fn send_typed<T: ActionSchema>(
        &self,
        request: &NutritionRequest,
    ) -> Result<T, ClientError> {
        let data = self.send(request).await?;
        serde_json::from_value(data).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn request_for<T: ActionSchema>(profile: &UserProfile) -> NutritionRequest {
    NutritionRequest::new(T::ACTION, profile.clone())
}
