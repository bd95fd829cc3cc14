pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::profile::handlers as candidates;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate extraction & persistence
        .route("/api/v1/candidates/autofill", post(candidates::handle_autofill))
        .route("/api/v1/candidates/parse", post(candidates::handle_parse))
        .route("/api/v1/candidates/upload", post(candidates::handle_upload))
        .route("/api/v1/candidates", post(candidates::handle_save))
        .route("/api/v1/candidates/:email", get(candidates::handle_get_candidate))
        // Interview session
        .route("/api/v1/interview", get(interview::handle_status))
        .route("/api/v1/interview/start", post(interview::handle_start))
        .route("/api/v1/interview/begin", post(interview::handle_begin))
        .route("/api/v1/interview/draft", post(interview::handle_draft))
        .route("/api/v1/interview/answer", post(interview::handle_answer))
        .route("/api/v1/interview/tick", post(interview::handle_tick))
        .route("/api/v1/interview/reset", post(interview::handle_reset))
        .with_state(state)
}
