//! Answers collected during onboarding.

use serde::{Deserialize, Serialize};

use crate::nutrition::{DietType, Goal, UserProfile};
use crate::targets::{MacroTargets, parse_weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Body details entered on the UserInfo screen.
///
/// Numeric fields are kept as the strings the user typed; only weight is
/// ever interpreted, and only through [`parse_weight`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub activity_level: String,
    #[serde(default)]
    pub blood_type: String,
}

impl UserInfo {
    /// Required fields still empty, in screen order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.height.trim().is_empty() {
            missing.push("height");
        }
        if self.weight.trim().is_empty() {
            missing.push("weight");
        }
        if self.age.trim().is_empty() {
            missing.push("age");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Everything the onboarding screens collect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingAnswers {
    pub goal: Option<Goal>,
    pub diet: Option<DietType>,
    pub user_info: UserInfo,
    /// Only set by finishing the body scan, never by an update.
    pub body_scan_completed: bool,
}

impl OnboardingAnswers {
    /// Merge a partial update. Absent fields keep their current value.
    pub fn apply(&mut self, update: AnswersUpdate) {
        if let Some(goal) = update.goal {
            self.goal = Some(goal);
        }
        if let Some(diet) = update.diet {
            self.diet = Some(diet);
        }
        if let Some(info) = update.user_info {
            info.apply_to(&mut self.user_info);
        }
    }

    pub fn weight_kg(&self) -> f64 {
        parse_weight(&self.user_info.weight)
    }

    /// Daily targets for the current goal and weight.
    pub fn targets(&self) -> MacroTargets {
        MacroTargets::compute(self.goal, self.weight_kg())
    }

    /// Profile for the nutrition proxy, once goal and diet are chosen.
    pub fn to_profile(&self) -> Option<UserProfile> {
        Some(UserProfile::from_targets(self.goal?, self.diet?, &self.targets()))
    }
}

/// Partial update to [`OnboardingAnswers`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnswersUpdate {
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub diet: Option<DietType>,
    #[serde(default)]
    pub user_info: Option<UserInfoUpdate>,
}

/// Partial update to [`UserInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserInfoUpdate {
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
}

impl UserInfoUpdate {
    fn apply_to(self, info: &mut UserInfo) {
        if let Some(v) = self.height {
            info.height = v;
        }
        if let Some(v) = self.weight {
            info.weight = v;
        }
        if let Some(v) = self.age {
            info.age = v;
        }
        if let Some(v) = self.gender {
            info.gender = Some(v);
        }
        if let Some(v) = self.activity_level {
            info.activity_level = v;
        }
        if let Some(v) = self.blood_type {
            info.blood_type = v;
        }
    }
}
