//! Nutrition AI: onboarding sessions and an LLM-backed nutrition proxy.

pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod nutrition;
pub mod onboarding;
pub mod server;
pub mod targets;
