//! Daily macro targets derived from goal and body weight.
//!
//! This is the single formula used wherever targets are shown: the macro
//! preview during onboarding, the final plan, and the profile sent to the
//! nutrition proxy.

use serde::{Deserialize, Serialize};

use crate::nutrition::Goal;

/// Energy density of protein, kcal per gram.
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Energy density of fat, kcal per gram.
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// Energy density of carbohydrate, kcal per gram.
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Share of daily calories allocated to fat.
pub const FAT_CALORIE_SHARE: f64 = 0.25;
/// Weight assumed when the user's entry cannot be used.
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

/// Per-kilogram multipliers selected by goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalFactors {
    pub kcal_per_kg: f64,
    pub protein_g_per_kg: f64,
}

impl GoalFactors {
    /// Factors for a goal; an unset goal uses the maintenance baseline.
    pub fn for_goal(goal: Option<Goal>) -> Self {
        match goal {
            Some(Goal::LoseFat) => Self {
                kcal_per_kg: 24.0,
                protein_g_per_kg: 2.2,
            },
            Some(Goal::GainMuscle) => Self {
                kcal_per_kg: 35.0,
                protein_g_per_kg: 2.4,
            },
            Some(Goal::Maintain) | None => Self {
                kcal_per_kg: 30.0,
                protein_g_per_kg: 2.0,
            },
        }
    }
}

/// Daily calorie and macro targets, in kcal and grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
}

impl MacroTargets {
    /// Compute targets for `goal` at `weight_kg`.
    ///
    /// Non-finite or non-positive weights fall back to [`DEFAULT_WEIGHT_KG`].
    pub fn compute(goal: Option<Goal>, weight_kg: f64) -> Self {
        let weight = if weight_kg.is_finite() && weight_kg > 0.0 {
            weight_kg
        } else {
            DEFAULT_WEIGHT_KG
        };
        let factors = GoalFactors::for_goal(goal);

        let calories = (weight * factors.kcal_per_kg).round();
        let protein = (weight * factors.protein_g_per_kg).round();
        let fats = (calories * FAT_CALORIE_SHARE / KCAL_PER_G_FAT).round();
        let carbs = ((calories - protein * KCAL_PER_G_PROTEIN - fats * KCAL_PER_G_FAT)
            / KCAL_PER_G_CARBS)
            .round()
            .max(0.0);

        Self {
            calories: calories as u32,
            protein: protein as u32,
            carbs: carbs as u32,
            fats: fats as u32,
        }
    }

    /// Calories implied by the macro grams.
    pub fn energy_from_macros(&self) -> f64 {
        f64::from(self.protein) * KCAL_PER_G_PROTEIN
            + f64::from(self.fats) * KCAL_PER_G_FAT
            + f64::from(self.carbs) * KCAL_PER_G_CARBS
    }
}

/// Parse a user-entered weight string, falling back to the default weight.
///
/// Only the leading whole number counts: "72kg", "72 kg" and "72.9" all read
/// as 72. No leading digits, or zero, means the default.
pub fn parse_weight(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let digits = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();

    digits
        .parse::<u32>()
        .ok()
        .filter(|w| *w > 0)
        .map(f64::from)
        .unwrap_or(DEFAULT_WEIGHT_KG)
}
