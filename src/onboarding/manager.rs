//! OnboardingManager: in-memory onboarding sessions and the simulated body
//! scan timer.
//!
//! Sessions idle longer than the TTL are dropped, lazily on `create` and by
//! the optional background sweeper. The registry is also capped in size.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use super::model::{AnswersUpdate, OnboardingAnswers};
use super::state::{OnboardingFlow, OnboardingStep};
use crate::error::OnboardingError;
use crate::nutrition::UserProfile;
use crate::targets::MacroTargets;

/// Idle time after which a session is reclaimed.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

type Sessions = Arc<RwLock<HashMap<Uuid, Session>>>;

struct Session {
    flow: OnboardingFlow,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Monotonic twin of `updated_at`, used for expiry.
    last_active: Instant,
    scan: Option<JoinHandle<()>>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            flow: OnboardingFlow::new(),
            created_at: now,
            updated_at: now,
            last_active: Instant::now(),
            scan: None,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.last_active = Instant::now();
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.last_active) >= ttl
    }

    fn cancel_scan(&mut self) {
        if let Some(handle) = self.scan.take() {
            handle.abort();
        }
    }

    fn status(&self, id: Uuid) -> OnboardingStatus {
        let step = self.flow.step();
        let answers = self.flow.answers();
        let plan = step.is_terminal().then(|| CompletedPlan {
            targets: answers.targets(),
            optimized: answers.body_scan_completed,
            profile: answers.to_profile(),
        });

        OnboardingStatus {
            id,
            step,
            step_number: step.number(),
            answers: answers.clone(),
            can_advance: self.flow.check_advance().is_ok(),
            can_skip: step.can_skip(),
            scan_in_progress: self.scan.is_some(),
            macro_preview: self.flow.macro_preview(),
            plan,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Snapshot of one onboarding session, as returned by every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub id: Uuid,
    pub step: OnboardingStep,
    pub step_number: u8,
    pub answers: OnboardingAnswers,
    /// Whether the current screen's forward control is enabled.
    pub can_advance: bool,
    pub can_skip: bool,
    pub scan_in_progress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_preview: Option<MacroTargets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<CompletedPlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result shown on PlanReady.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPlan {
    pub targets: MacroTargets,
    /// True when the body scan was completed rather than skipped.
    pub optimized: bool,
    /// Ready to send to the nutrition proxy; absent without goal and diet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

/// Owns every onboarding session and its pending scan timer.
pub struct OnboardingManager {
    sessions: Sessions,
    scan_duration: Duration,
    session_ttl: Duration,
    max_sessions: usize,
}

impl OnboardingManager {
    pub fn new(scan_duration: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            scan_duration,
            session_ttl: DEFAULT_SESSION_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    pub fn scan_duration(&self) -> Duration {
        self.scan_duration
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Start a new session on the Welcome screen.
    ///
    /// Expired sessions are reclaimed first. Fails when the registry is
    /// still full afterwards.
    pub async fn create(&self) -> Result<OnboardingStatus, OnboardingError> {
        let mut sessions = self.sessions.write().await;
        let reclaimed = evict_expired(&mut sessions, self.session_ttl);
        if reclaimed > 0 {
            tracing::debug!(reclaimed, "Expired onboarding sessions reclaimed");
        }
        if sessions.len() >= self.max_sessions {
            tracing::warn!(limit = self.max_sessions, "Onboarding session limit reached");
            return Err(OnboardingError::TooManySessions {
                limit: self.max_sessions,
            });
        }

        let id = Uuid::new_v4();
        let session = Session::new();
        let status = session.status(id);
        sessions.insert(id, session);
        tracing::info!(session = %id, "Onboarding session created");
        Ok(status)
    }

    /// Drop every session idle for at least the TTL. Returns how many went.
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.session_ttl)
    }

    /// Run `sweep_expired` every `every` until the manager is dropped.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = Arc::downgrade(&self.sessions);
        let ttl = self.session_ttl;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let Some(sessions) = registry.upgrade() else {
                    return;
                };
                let reclaimed = evict_expired(&mut *sessions.write().await, ttl);
                if reclaimed > 0 {
                    tracing::info!(reclaimed, "Expired onboarding sessions swept");
                }
            }
        })
    }

    pub async fn status(&self, id: Uuid) -> Result<OnboardingStatus, OnboardingError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or(OnboardingError::SessionNotFound(id))?;
        Ok(session.status(id))
    }

    /// Merge partial answers into the session.
    pub async fn update_answers(
        &self,
        id: Uuid,
        update: AnswersUpdate,
    ) -> Result<OnboardingStatus, OnboardingError> {
        self.with_session(id, |session| {
            session.flow.update(update);
            Ok(())
        })
        .await
    }

    /// Advance past the current screen if its checks pass.
    ///
    /// On MacroPreview this is the "optimize" choice and leads to BodyScan.
    pub async fn advance(&self, id: Uuid) -> Result<OnboardingStatus, OnboardingError> {
        self.with_session(id, |session| {
            let from = session.flow.step();
            let to = session.flow.try_advance()?;
            tracing::info!(session = %id, %from, %to, "Onboarding advanced");
            Ok(())
        })
        .await
    }

    /// Begin the simulated body scan.
    ///
    /// After the configured duration the scan is marked complete and the
    /// session moves to PlanReady. Starting again while a scan runs is a
    /// no-op.
    pub async fn start_scan(&self, id: Uuid) -> Result<OnboardingStatus, OnboardingError> {
        let registry = Arc::downgrade(&self.sessions);
        let duration = self.scan_duration;

        self.with_session(id, |session| {
            let step = session.flow.step();
            if step != OnboardingStep::BodyScan {
                return Err(OnboardingError::NotAvailable { step });
            }
            if session.scan.is_none() {
                session.scan = Some(tokio::spawn(finish_scan_after(registry, id, duration)));
                tracing::info!(
                    session = %id,
                    duration_ms = duration.as_millis() as u64,
                    "Body scan started"
                );
            }
            Ok(())
        })
        .await
    }

    /// Skip to PlanReady from MacroPreview or BodyScan, cancelling any scan.
    pub async fn skip(&self, id: Uuid) -> Result<OnboardingStatus, OnboardingError> {
        self.with_session(id, |session| {
            let from = session.flow.step();
            session.flow.try_skip()?;
            session.cancel_scan();
            tracing::info!(session = %id, %from, "Onboarding skipped to plan");
            Ok(())
        })
        .await
    }

    /// Remove a session, cancelling any scan.
    pub async fn delete(&self, id: Uuid) -> Result<(), OnboardingError> {
        let mut session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(OnboardingError::SessionNotFound(id))?;
        session.cancel_scan();
        tracing::info!(session = %id, "Onboarding session deleted");
        Ok(())
    }

    async fn with_session<F>(&self, id: Uuid, f: F) -> Result<OnboardingStatus, OnboardingError>
    where
        F: FnOnce(&mut Session) -> Result<(), OnboardingError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(OnboardingError::SessionNotFound(id))?;
        f(session)?;
        session.touch();
        Ok(session.status(id))
    }
}

impl Default for OnboardingManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

fn evict_expired(sessions: &mut HashMap<Uuid, Session>, ttl: Duration) -> usize {
    let now = Instant::now();
    let before = sessions.len();
    sessions.retain(|id, session| {
        if !session.is_expired(now, ttl) {
            return true;
        }
        session.cancel_scan();
        tracing::debug!(session = %id, "Onboarding session expired");
        false
    });
    before - sessions.len()
}

/// Scan timer body. Holds only a weak reference so a dropped manager does
/// not outlive its last handle.
async fn finish_scan_after(
    registry: Weak<RwLock<HashMap<Uuid, Session>>>,
    id: Uuid,
    duration: Duration,
) {
    tokio::time::sleep(duration).await;

    let Some(sessions) = registry.upgrade() else {
        return;
    };
    let mut sessions = sessions.write().await;
    let Some(session) = sessions.get_mut(&id) else {
        return;
    };

    // Dropping our own handle detaches; it must not abort.
    session.scan = None;
    match session.flow.complete_body_scan() {
        Ok(()) => {
            session.touch();
            tracing::info!(session = %id, "Body scan completed");
        }
        Err(e) => {
            tracing::debug!(session = %id, error = %e, "Body scan finished after leaving scan step")
        }
    }
}
