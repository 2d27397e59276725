//! Onboarding: the seven-screen flow that collects a goal, a diet and body
//! details, previews macro targets, and optionally runs a simulated body
//! scan before showing the finished plan.
//!
//! Sessions live in memory only, expire when idle, and are driven over REST.

pub mod manager;
pub mod model;
pub mod routes;
pub mod state;

pub use manager::{
    CompletedPlan, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL, OnboardingManager, OnboardingStatus,
};
pub use model::{AnswersUpdate, Gender, OnboardingAnswers, UserInfo, UserInfoUpdate};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use state::{OnboardingFlow, OnboardingStep};
