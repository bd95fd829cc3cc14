use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interview::question_bank::build_question_bank;
use crate::interview::session::{SessionPhase, SessionSnapshot, SubmitOutcome, TickOutcome};
use crate::persistence::save_response;
use crate::profile::Profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub struct BeginRequest {
    pub consent: bool,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
    /// Optional reviewer rating, clamped into 1..=5 when stored.
    pub rating: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// What the last command did: "started", "recorded", "auto_advanced",
    /// "waiting", "accepted", "inactive" or "reset".
    pub outcome: &'static str,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    /// Expected `tick` cadence; auto-advance precision is bounded by it.
    pub poll_interval_secs: u64,
}

fn respond(state: &AppState, outcome: &'static str, snapshot: SessionSnapshot) -> Json<SessionResponse> {
    Json(SessionResponse {
        outcome,
        snapshot,
        poll_interval_secs: state.config.tick_poll_interval.as_secs(),
    })
}

/// POST /api/v1/interview/start
///
/// Builds the question bank for the given profile and moves the session to
/// `AwaitingConsent`. The bank is built before the session lock is taken;
/// provider calls are slow.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    {
        let active = state.session.lock().await;
        if active.interview.phase() != SessionPhase::NotStarted {
            return Err(AppError::SessionConflict(
                "an interview is already active; reset it first".to_string(),
            ));
        }
    }

    let questions = build_question_bank(&req.profile, state.provider.as_ref()).await;

    let mut active = state.session.lock().await;
    active.interview.start(questions)?;
    active.profile = Some(req.profile);
    info!(
        "interview {} ready: {} questions",
        active.id,
        active.interview.total_questions()
    );
    let snapshot = active.interview.snapshot(Instant::now());
    Ok(respond(&state, "started", snapshot))
}

/// POST /api/v1/interview/begin
pub async fn handle_begin(
    State(state): State<AppState>,
    Json(req): Json<BeginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let now = Instant::now();
    let mut active = state.session.lock().await;
    active.interview.begin(req.consent, now)?;
    let candidate = active
        .profile
        .as_ref()
        .map(|p| p.name.as_str())
        .unwrap_or("<unnamed>");
    info!("interview {} began for {candidate}", active.id);
    let snapshot = active.interview.snapshot(now);
    Ok(respond(&state, "started", snapshot))
}

/// POST /api/v1/interview/draft
pub async fn handle_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let now = Instant::now();
    let mut active = state.session.lock().await;
    let accepted = active.interview.update_draft(req.text);
    let snapshot = active.interview.snapshot(now);
    Ok(respond(&state, if accepted { "accepted" } else { "inactive" }, snapshot))
}

/// POST /api/v1/interview/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let now = Instant::now();
    let mut active = state.session.lock().await;

    let outcome = active.interview.submit_answer(req.text, now);
    let label = match &outcome {
        SubmitOutcome::Recorded { .. } => "recorded",
        SubmitOutcome::Inactive => "inactive",
    };
    if let SubmitOutcome::Recorded { recorded, .. } = &outcome {
        save_response(
            &state.db,
            active.id,
            &recorded.question.text,
            &recorded.answer,
            recorded.answered_at,
            req.rating,
        )
        .await?;
    }

    let snapshot = active.interview.snapshot(now);
    Ok(respond(&state, label, snapshot))
}

/// POST /api/v1/interview/tick
///
/// The host's poll. When the current question's time limit has elapsed the
/// draft answer is recorded (even if blank) and the session advances.
pub async fn handle_tick(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let now = Instant::now();
    let mut active = state.session.lock().await;

    let outcome = active.interview.tick(now);
    let label = match &outcome {
        TickOutcome::AutoAdvanced { .. } => "auto_advanced",
        TickOutcome::Waiting { .. } => "waiting",
        TickOutcome::Inactive => "inactive",
    };
    if let TickOutcome::AutoAdvanced { recorded, .. } = &outcome {
        save_response(
            &state.db,
            active.id,
            &recorded.question.text,
            &recorded.answer,
            recorded.answered_at,
            None,
        )
        .await?;
    }

    let snapshot = active.interview.snapshot(now);
    Ok(respond(&state, label, snapshot))
}

/// POST /api/v1/interview/reset
pub async fn handle_reset(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut active = state.session.lock().await;
    info!(
        "session {} reset after {} recorded answers",
        active.id,
        active.interview.answers().len()
    );
    active.reset();
    let snapshot = active.interview.snapshot(Instant::now());
    Ok(respond(&state, "reset", snapshot))
}

/// GET /api/v1/interview
pub async fn handle_status(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let active = state.session.lock().await;
    let snapshot = active.interview.snapshot(Instant::now());
    Ok(respond(&state, "status", snapshot))
}
