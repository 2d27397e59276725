//! Onboarding step machine: which screen the user is on and where they may
//! go next.

use serde::{Deserialize, Serialize};

use super::model::{AnswersUpdate, OnboardingAnswers};
use crate::error::OnboardingError;
use crate::targets::MacroTargets;

/// The seven onboarding screens, numbered 1 through 7.
///
/// Progresses linearly: Welcome → Goal → Diet → UserInfo → MacroPreview →
/// BodyScan → PlanReady. MacroPreview may also jump straight to PlanReady.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Welcome,
    Goal,
    Diet,
    UserInfo,
    MacroPreview,
    BodyScan,
    PlanReady,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 7] = [
        Self::Welcome,
        Self::Goal,
        Self::Diet,
        Self::UserInfo,
        Self::MacroPreview,
        Self::BodyScan,
        Self::PlanReady,
    ];

    /// Screen number, 1-based.
    pub fn number(&self) -> u8 {
        match self {
            Self::Welcome => 1,
            Self::Goal => 2,
            Self::Diet => 3,
            Self::UserInfo => 4,
            Self::MacroPreview => 5,
            Self::BodyScan => 6,
            Self::PlanReady => 7,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        use OnboardingStep::*;
        matches!(
            (self, target),
            (Welcome, Goal)
                | (Goal, Diet)
                | (Diet, UserInfo)
                | (UserInfo, MacroPreview)
                | (MacroPreview, BodyScan)
                | (MacroPreview, PlanReady)
                | (BodyScan, PlanReady)
        )
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Welcome => Some(Goal),
            Goal => Some(Diet),
            Diet => Some(UserInfo),
            UserInfo => Some(MacroPreview),
            MacroPreview => Some(BodyScan),
            BodyScan => Some(PlanReady),
            PlanReady => None,
        }
    }

    /// Whether onboarding is done.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PlanReady)
    }

    /// Steps offering a way straight to PlanReady.
    pub fn can_skip(&self) -> bool {
        matches!(self, Self::MacroPreview | Self::BodyScan)
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::Welcome
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::Goal => "goal",
            Self::Diet => "diet",
            Self::UserInfo => "user_info",
            Self::MacroPreview => "macro_preview",
            Self::BodyScan => "body_scan",
            Self::PlanReady => "plan_ready",
        };
        write!(f, "{s}")
    }
}

/// Step cursor plus the answers collected so far.
///
/// `advance`, `update` and `skip_to_ready` are the raw controls and never
/// fail. The `try_*` methods apply the checks each screen makes before
/// enabling its forward control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingFlow {
    step: OnboardingStep,
    answers: OnboardingAnswers,
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn answers(&self) -> &OnboardingAnswers {
        &self.answers
    }

    /// Move to the next step. Stays put on PlanReady.
    pub fn advance(&mut self) -> OnboardingStep {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        self.step
    }

    /// Merge a partial answer update.
    pub fn update(&mut self, update: AnswersUpdate) {
        self.answers.apply(update);
    }

    /// Jump to PlanReady, bypassing the body scan.
    pub fn skip_to_ready(&mut self) {
        self.step = OnboardingStep::PlanReady;
    }

    /// Advance if the current screen would allow it.
    pub fn try_advance(&mut self) -> Result<OnboardingStep, OnboardingError> {
        self.check_advance()?;
        Ok(self.advance())
    }

    /// The step `try_advance` would move to, or why it cannot.
    pub fn check_advance(&self) -> Result<OnboardingStep, OnboardingError> {
        let step = self.step;
        let incomplete = |reason: &str| OnboardingError::StepIncomplete {
            step,
            reason: reason.to_string(),
        };

        match step {
            OnboardingStep::Goal if self.answers.goal.is_none() => {
                return Err(incomplete("no goal selected"));
            }
            OnboardingStep::Diet if self.answers.diet.is_none() => {
                return Err(incomplete("no diet selected"));
            }
            OnboardingStep::UserInfo => {
                let missing = self.answers.user_info.missing_fields();
                if !missing.is_empty() {
                    return Err(incomplete(&format!("missing {}", missing.join(", "))));
                }
            }
            OnboardingStep::BodyScan => {
                return Err(incomplete("complete or skip the body scan"));
            }
            OnboardingStep::PlanReady => {
                return Err(OnboardingError::NotAvailable { step });
            }
            _ => {}
        }

        match step.next() {
            Some(next) if step.can_transition_to(next) => Ok(next),
            Some(next) => Err(OnboardingError::InvalidTransition { from: step, to: next }),
            None => Err(OnboardingError::NotAvailable { step }),
        }
    }

    /// Skip to PlanReady from MacroPreview or BodyScan.
    ///
    /// Skipping never marks the body scan complete.
    pub fn try_skip(&mut self) -> Result<(), OnboardingError> {
        if !self.step.can_skip() {
            return Err(OnboardingError::InvalidTransition {
                from: self.step,
                to: OnboardingStep::PlanReady,
            });
        }
        self.skip_to_ready();
        Ok(())
    }

    /// Finish the simulated scan: mark it complete and move to PlanReady.
    pub fn complete_body_scan(&mut self) -> Result<(), OnboardingError> {
        if self.step != OnboardingStep::BodyScan {
            return Err(OnboardingError::NotAvailable { step: self.step });
        }
        self.answers.body_scan_completed = true;
        self.step = OnboardingStep::PlanReady;
        Ok(())
    }

    /// Targets shown on MacroPreview, once goal and weight are known.
    pub fn macro_preview(&self) -> Option<MacroTargets> {
        if self.answers.goal.is_none() || self.answers.user_info.weight.trim().is_empty() {
            return None;
        }
        Some(self.answers.targets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{DietType, Goal};
    use crate::onboarding::model::{Gender, UserInfoUpdate};

    fn filled() -> AnswersUpdate {
        AnswersUpdate {
            goal: Some(Goal::LoseFat),
            diet: Some(DietType::Omnivore),
            user_info: Some(UserInfoUpdate {
                height: Some("180".into()),
                weight: Some("70".into()),
                age: Some("30".into()),
                gender: Some(Gender::Male),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn numbering_round_trips() {
        for step in OnboardingStep::ALL {
            assert_eq!(OnboardingStep::from_number(step.number()), Some(step));
        }
        assert_eq!(OnboardingStep::from_number(0), None);
        assert_eq!(OnboardingStep::from_number(8), None);
    }

    #[test]
    fn valid_transitions() {
        use OnboardingStep::*;
        for pair in OnboardingStep::ALL.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        assert!(MacroPreview.can_transition_to(PlanReady));
    }

    #[test]
    fn invalid_transitions() {
        use OnboardingStep::*;
        assert!(!Welcome.can_transition_to(Diet));
        assert!(!UserInfo.can_transition_to(PlanReady));
        assert!(!BodyScan.can_transition_to(MacroPreview));
        assert!(!PlanReady.can_transition_to(Welcome));
        assert!(!PlanReady.can_transition_to(PlanReady));
    }

    #[test]
    fn display_matches_serde() {
        for step in OnboardingStep::ALL {
            let json = serde_json::to_value(step).unwrap();
            assert_eq!(json.as_str().unwrap(), step.to_string());
        }
    }

    #[test]
    fn optimize_path_takes_six_advances() {
        let mut flow = OnboardingFlow::new();
        assert_eq!(flow.step().number(), 1);
        for expected in 2..=7 {
            assert_eq!(flow.advance().number(), expected);
        }
        assert!(flow.step().is_terminal());
    }

    #[test]
    fn skip_path_takes_four_advances_then_skip() {
        let mut flow = OnboardingFlow::new();
        for _ in 0..4 {
            flow.advance();
        }
        assert_eq!(flow.step(), OnboardingStep::MacroPreview);
        flow.skip_to_ready();
        assert_eq!(flow.step(), OnboardingStep::PlanReady);
        assert!(!flow.answers().body_scan_completed);
    }

    #[test]
    fn advance_stays_on_plan_ready() {
        let mut flow = OnboardingFlow::new();
        flow.skip_to_ready();
        assert_eq!(flow.advance(), OnboardingStep::PlanReady);
        assert_eq!(flow.advance(), OnboardingStep::PlanReady);
    }

    #[test]
    fn guards_block_until_answers_present() {
        let mut flow = OnboardingFlow::new();
        assert_eq!(flow.try_advance().unwrap(), OnboardingStep::Goal);

        let err = flow.try_advance().unwrap_err();
        assert!(matches!(err, OnboardingError::StepIncomplete { step: OnboardingStep::Goal, .. }));

        flow.update(AnswersUpdate {
            goal: Some(Goal::GainMuscle),
            ..Default::default()
        });
        assert_eq!(flow.try_advance().unwrap(), OnboardingStep::Diet);
        assert!(flow.try_advance().is_err());

        flow.update(AnswersUpdate {
            diet: Some(DietType::Vegan),
            ..Default::default()
        });
        flow.try_advance().unwrap();

        flow.update(AnswersUpdate {
            user_info: Some(UserInfoUpdate {
                height: Some("170".into()),
                weight: Some("65".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let err = flow.try_advance().unwrap_err();
        assert_eq!(err.to_string(), "Cannot leave user_info yet: missing age, gender");
    }

    #[test]
    fn body_scan_cannot_be_advanced_directly() {
        let mut flow = OnboardingFlow::new();
        flow.update(filled());
        for _ in 0..5 {
            flow.try_advance().unwrap();
        }
        assert_eq!(flow.step(), OnboardingStep::BodyScan);
        assert!(matches!(
            flow.try_advance(),
            Err(OnboardingError::StepIncomplete { step: OnboardingStep::BodyScan, .. })
        ));

        flow.complete_body_scan().unwrap();
        assert_eq!(flow.step(), OnboardingStep::PlanReady);
        assert!(flow.answers().body_scan_completed);
        assert!(matches!(
            flow.try_advance(),
            Err(OnboardingError::NotAvailable { .. })
        ));
    }

    #[test]
    fn skip_only_from_preview_or_scan() {
        let mut flow = OnboardingFlow::new();
        flow.update(filled());
        assert!(matches!(
            flow.try_skip(),
            Err(OnboardingError::InvalidTransition { from: OnboardingStep::Welcome, .. })
        ));

        for _ in 0..5 {
            flow.try_advance().unwrap();
        }
        flow.try_skip().unwrap();
        assert_eq!(flow.step(), OnboardingStep::PlanReady);
        assert!(!flow.answers().body_scan_completed);
    }

    #[test]
    fn scan_completion_requires_body_scan_step() {
        let mut flow = OnboardingFlow::new();
        assert!(flow.complete_body_scan().is_err());
        assert!(!flow.answers().body_scan_completed);
    }

    #[test]
    fn preview_needs_goal_and_weight() {
        let mut flow = OnboardingFlow::new();
        assert!(flow.macro_preview().is_none());
        flow.update(AnswersUpdate {
            goal: Some(Goal::LoseFat),
            ..Default::default()
        });
        assert!(flow.macro_preview().is_none());
        flow.update(filled());
        let preview = flow.macro_preview().unwrap();
        assert_eq!(preview.calories, 1680);
        assert_eq!(preview.protein, 154);
    }
}
