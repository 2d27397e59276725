//! Request and envelope types for the nutrition proxy.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::NutritionAction;
use crate::error::ProxyError;
use crate::targets::MacroTargets;

/// What the user is trying to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    LoseFat,
    GainMuscle,
    Maintain,
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoseFat => write!(f, "lose-fat"),
            Self::GainMuscle => write!(f, "gain-muscle"),
            Self::Maintain => write!(f, "maintain"),
        }
    }
}

/// How the user eats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Omnivore,
    Vegetarian,
    Vegan,
    Pescatarian,
}

impl std::fmt::Display for DietType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Omnivore => write!(f, "omnivore"),
            Self::Vegetarian => write!(f, "vegetarian"),
            Self::Vegan => write!(f, "vegan"),
            Self::Pescatarian => write!(f, "pescatarian"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakfast => write!(f, "breakfast"),
            Self::Lunch => write!(f, "lunch"),
            Self::Dinner => write!(f, "dinner"),
            Self::Snack => write!(f, "snack"),
        }
    }
}

/// Goal, diet and daily targets sent with every proxy request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub goal: Goal,
    pub diet_type: DietType,
    pub protein_target: f64,
    pub carbs_target: f64,
    pub fats_target: f64,
    pub calories_target: f64,
}

impl UserProfile {
    pub fn from_targets(goal: Goal, diet_type: DietType, targets: &MacroTargets) -> Self {
        Self {
            goal,
            diet_type,
            protein_target: f64::from(targets.protein),
            carbs_target: f64::from(targets.carbs),
            fats_target: f64::from(targets.fats),
            calories_target: f64::from(targets.calories),
        }
    }
}

/// Grams of each macro plus calories. Used for current intake and for the
/// per-item amounts in AI responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroAmounts {
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(default)]
    pub calories: f64,
}

/// Request body exactly as received on the wire.
///
/// `action` stays a string so an unknown action can be reported by name. The
/// other fields stay raw JSON until the action has been accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequestBody {
    pub action: String,
    #[serde(default)]
    pub user_profile: Option<Value>,
    #[serde(default)]
    pub current_macros: Option<Value>,
    #[serde(default)]
    pub meal_type: Option<Value>,
    #[serde(default)]
    pub preferences: Option<Value>,
}

/// Decode one optional body field, naming it in the error.
fn decode_field<T: DeserializeOwned>(
    name: &str,
    raw: Option<Value>,
) -> Result<Option<T>, ProxyError> {
    raw.map(|value| {
        serde_json::from_value(value)
            .map_err(|e| ProxyError::InvalidRequest(format!("{name}: {e}")))
    })
    .transpose()
}

/// A validated nutrition request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    pub action: NutritionAction,
    pub user_profile: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_macros: Option<MacroAmounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

impl NutritionRequest {
    pub fn new(action: NutritionAction, user_profile: UserProfile) -> Self {
        Self {
            action,
            user_profile,
            current_macros: None,
            meal_type: None,
            preferences: None,
        }
    }

    pub fn with_current_macros(mut self, current: MacroAmounts) -> Self {
        self.current_macros = Some(current);
        self
    }

    pub fn with_meal_type(mut self, meal_type: MealType) -> Self {
        self.meal_type = Some(meal_type);
        self
    }

    pub fn with_preferences(mut self, preferences: impl Into<String>) -> Self {
        self.preferences = Some(preferences.into());
        self
    }
}

impl TryFrom<NutritionRequestBody> for NutritionRequest {
    type Error = ProxyError;

    fn try_from(body: NutritionRequestBody) -> Result<Self, Self::Error> {
        let action: NutritionAction = body.action.parse()?;
        let user_profile = decode_field("userProfile", body.user_profile)?
            .ok_or_else(|| ProxyError::InvalidRequest("userProfile is required".to_string()))?;
        Ok(Self {
            action,
            user_profile,
            current_macros: decode_field("currentMacros", body.current_macros)?,
            meal_type: decode_field("mealType", body.meal_type)?,
            preferences: decode_field("preferences", body.preferences)?,
        })
    }
}

/// Uniform response envelope: `{success, data?, error?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set on failures a caller may retry later (rate limit, timeout).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl<T> NutritionResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            retryable: false,
        }
    }

    pub fn failure(error: impl Into<String>, retryable: bool) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            retryable,
        }
    }
}
