//! Nutrition actions and the response schema each one expects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::model::MacroAmounts;
use super::prompts;
use crate::error::ProxyError;

/// The four things the proxy can ask the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NutritionAction {
    SuggestMeals,
    OptimizeMeal,
    AnalyzeMacros,
    CreateMealPlan,
}

impl NutritionAction {
    pub const ALL: [NutritionAction; 4] = [
        Self::SuggestMeals,
        Self::OptimizeMeal,
        Self::AnalyzeMacros,
        Self::CreateMealPlan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuggestMeals => "suggest-meals",
            Self::OptimizeMeal => "optimize-meal",
            Self::AnalyzeMacros => "analyze-macros",
            Self::CreateMealPlan => "create-meal-plan",
        }
    }

    /// System prompt sent ahead of the user message.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::SuggestMeals => prompts::SUGGEST_MEALS_PROMPT,
            Self::OptimizeMeal => prompts::OPTIMIZE_MEAL_PROMPT,
            Self::AnalyzeMacros => prompts::ANALYZE_MACROS_PROMPT,
            Self::CreateMealPlan => prompts::CREATE_MEAL_PLAN_PROMPT,
        }
    }

    /// Decode a response payload into this action's typed output.
    pub fn decode(&self, data: serde_json::Value) -> Result<ActionOutput, serde_json::Error> {
        Ok(match self {
            Self::SuggestMeals => ActionOutput::Meals(serde_json::from_value(data)?),
            Self::OptimizeMeal => ActionOutput::Optimization(serde_json::from_value(data)?),
            Self::AnalyzeMacros => ActionOutput::Analysis(serde_json::from_value(data)?),
            Self::CreateMealPlan => ActionOutput::MealPlan(serde_json::from_value(data)?),
        })
    }
}

impl std::fmt::Display for NutritionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NutritionAction {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ProxyError::UnknownAction(s.to_string()))
    }
}

/// Typed response payload, one variant per action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutput {
    Meals(SuggestedMeals),
    Optimization(MealOptimization),
    Analysis(MacroAnalysis),
    MealPlan(DailyMealPlan),
}

/// Ties a response type to the action that produces it.
pub trait ActionSchema: DeserializeOwned {
    const ACTION: NutritionAction;
}

// ── suggest-meals ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedMeals {
    #[serde(default)]
    pub meals: Vec<SuggestedMeal>,
}

impl ActionSchema for SuggestedMeals {
    const ACTION: NutritionAction = NutritionAction::SuggestMeals;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMeal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories: f64,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub prep_time: String,
}

// ── optimize-meal ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealOptimization {
    pub analysis: String,
    pub gaps: MacroGaps,
    #[serde(default)]
    pub suggestions: Vec<OptimizationSuggestion>,
    pub optimized_meal: OptimizedMeal,
}

impl ActionSchema for MealOptimization {
    const ACTION: NutritionAction = NutritionAction::OptimizeMeal;
}

/// Signed distance from each target; negative means over target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGaps {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Add,
    Swap,
    Reduce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub item: String,
    pub impact: MacroAmounts,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedMeal {
    pub name: String,
    pub macros: MacroAmounts,
}

// ── analyze-macros ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroAnalysis {
    pub score: f64,
    #[serde(default)]
    pub insights: Vec<MacroInsight>,
    pub macro_balance: MacroBalance,
}

impl ActionSchema for MacroAnalysis {
    const ACTION: NutritionAction = NutritionAction::AnalyzeMacros;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Protein,
    Carbs,
    Fats,
    Overall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightStatus {
    Optimal,
    NeedsAttention,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroInsight {
    pub category: InsightCategory,
    pub status: InsightStatus,
    pub message: String,
    #[serde(default)]
    pub recommendation: String,
}

/// Percentage of calories from each macro.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroBalance {
    pub protein_ratio: f64,
    pub carbs_ratio: f64,
    pub fats_ratio: f64,
}

// ── create-meal-plan ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMealPlan {
    pub daily_plan: DailyPlan,
    pub totals: MacroAmounts,
    #[serde(default)]
    pub shopping_list: Vec<String>,
    #[serde(default)]
    pub meal_prep_tips: Vec<String>,
}

impl ActionSchema for DailyMealPlan {
    const ACTION: NutritionAction = NutritionAction::CreateMealPlan;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub breakfast: PlannedMeal,
    pub snack1: PlannedMeal,
    pub lunch: PlannedMeal,
    pub snack2: PlannedMeal,
    pub dinner: PlannedMeal,
}

impl DailyPlan {
    /// Meals in eating order.
    pub fn meals(&self) -> [(&'static str, &PlannedMeal); 5] {
        [
            ("breakfast", &self.breakfast),
            ("snack1", &self.snack1),
            ("lunch", &self.lunch),
            ("snack2", &self.snack2),
            ("dinner", &self.dinner),
        ]
    }

    /// Sum of the five planned meals.
    pub fn sum(&self) -> MacroAmounts {
        self.meals()
            .iter()
            .fold(MacroAmounts::default(), |acc, (_, meal)| MacroAmounts {
                protein: acc.protein + meal.protein,
                carbs: acc.carbs + meal.carbs,
                fats: acc.fats + meal.fats,
                calories: acc.calories + meal.calories,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub name: String,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories: f64,
}
