use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::extraction::{extract_text, FileKind};
use crate::persistence::{fetch_candidate, save_profile, SaveOutcome};
use crate::profile::heuristic::{extract_autofill, PartialProfile};
use crate::profile::reconcile::reconcile;
use crate::profile::structured::parse_resume;
use crate::profile::Profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RawTextRequest {
    pub raw_text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub profile: Profile,
    /// Informational notices about degraded extraction paths.
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub status: &'static str,
}

/// POST /api/v1/candidates/autofill
pub async fn handle_autofill(Json(req): Json<RawTextRequest>) -> Json<PartialProfile> {
    Json(extract_autofill(&req.raw_text))
}

/// POST /api/v1/candidates/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<RawTextRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile = parse_resume(&req.raw_text, state.provider.as_ref()).await?;
    Ok(Json(profile))
}

/// POST /api/v1/candidates/upload
///
/// Decodes the uploaded file and runs the full extraction pipeline. A failed
/// structured pass degrades to the heuristic-only profile with a notice; only
/// an unreadable request is an error.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file_name = String::new();
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().unwrap_or_default().to_string();
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?,
            );
        }
    }

    let data = data.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;
    let text = extract_text(&data, FileKind::from_file_name(&file_name));

    let mut notices = Vec::new();
    if text.trim().is_empty() {
        notices.push(
            "no text could be extracted from the upload; fill the fields manually".to_string(),
        );
    }

    let heuristic = extract_autofill(&text);
    let structured = match parse_resume(&text, state.provider.as_ref()).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("structured extraction failed, falling back to autofill: {e}");
            notices.push(format!("structured extraction unavailable: {e}"));
            None
        }
    };

    let profile = reconcile(&Profile::default(), &heuristic, structured.as_ref());
    if !profile.persistable() {
        notices.push("no valid email found; the profile cannot be saved until one is provided".to_string());
    }

    Ok(Json(UploadResponse { profile, notices }))
}

/// POST /api/v1/candidates
pub async fn handle_save(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    if !profile.persistable() {
        return Err(AppError::Validation(
            "a valid email is required to save a candidate".to_string(),
        ));
    }
    let outcome = save_profile(&state.db, &profile).await?;
    Ok(Json(SaveProfileResponse {
        status: match outcome {
            SaveOutcome::Saved => "saved",
            SaveOutcome::AlreadyExists => "already_exists",
        },
    }))
}

/// GET /api/v1/candidates/:email
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile = fetch_candidate(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no candidate with email {email}")))?;
    Ok(Json(profile))
}
