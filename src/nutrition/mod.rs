//! Nutrition AI proxy.
//!
//! Accepts a nutrition action plus the user's profile, asks the upstream
//! model for a JSON answer using an action-specific system prompt, and
//! returns the first JSON object found in the completion inside a uniform
//! `{success, data, error}` envelope.

pub mod action;
pub mod extract;
pub mod model;
pub mod prompts;
pub mod routes;
pub mod service;

pub use action::{
    ActionOutput, ActionSchema, DailyMealPlan, DailyPlan, InsightCategory, InsightStatus,
    MacroAnalysis, MacroBalance, MacroGaps, MacroInsight, MealOptimization, NutritionAction,
    OptimizationSuggestion, OptimizedMeal, PlannedMeal, SuggestedMeal, SuggestedMeals,
    SuggestionKind,
};
pub use model::{
    DietType, Goal, MacroAmounts, MealType, NutritionRequest, NutritionRequestBody,
    NutritionResponse, UserProfile,
};
pub use routes::{NutritionRouteState, nutrition_routes};
pub use service::NutritionAi;
