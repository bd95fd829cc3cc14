use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::interview::session::InterviewSession;
use crate::llm_client::CompletionProvider;
use crate::profile::Profile;

/// The single live candidate session. One candidate at a time: every
/// transition happens inside a handler holding the `AppState` lock, so the
/// interview and profile are exclusively owned and need no further locking.
#[derive(Debug)]
pub struct ActiveSession {
    pub id: Uuid,
    pub profile: Option<Profile>,
    pub interview: InterviewSession,
}

impl ActiveSession {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: None,
            interview: InterviewSession::new(time_limit),
        }
    }

    /// Discards the candidate and interview entirely; the next session gets
    /// a fresh id.
    pub fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.profile = None;
        self.interview.reset();
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable completion provider. Production: `AnthropicClient`.
    pub provider: Arc<dyn CompletionProvider>,
    pub config: Config,
    pub session: Arc<Mutex<ActiveSession>>,
}
