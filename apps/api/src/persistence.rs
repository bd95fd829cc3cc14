//! Candidate and response persistence.
//!
//! Candidates are keyed by unique email and written at most once; replaying a
//! save reports `AlreadyExists` instead of retrying. Responses are
//! append-only with no de-duplication.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::candidate::CandidateRow;
use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadyExists,
}

pub async fn save_profile(pool: &PgPool, profile: &Profile) -> Result<SaveOutcome> {
    let projects = serde_json::to_value(&profile.projects)?;
    let result = sqlx::query(
        r#"
        INSERT INTO candidates
            (id, name, email, phone, location, years_experience,
             tech_stack, desired_positions, projects)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&profile.name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(&profile.location)
    .bind(i16::from(profile.years_experience))
    .bind(&profile.tech_stack)
    .bind(&profile.desired_positions)
    .bind(projects)
    .execute(pool)
    .await?;

    Ok(if result.rows_affected() == 0 {
        SaveOutcome::AlreadyExists
    } else {
        SaveOutcome::Saved
    })
}

pub async fn save_response(
    pool: &PgPool,
    session_id: Uuid,
    question: &str,
    answer: &str,
    answered_at: DateTime<Utc>,
    rating: Option<i32>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO responses (id, session_id, question, answer, rating, answered_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session_id)
    .bind(question)
    .bind(answer)
    .bind(rating.map(clamp_rating))
    .bind(answered_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn fetch_candidate(pool: &PgPool, email: &str) -> Result<Option<Profile>> {
    let row: Option<CandidateRow> =
        sqlx::query_as("SELECT * FROM candidates WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(Profile::from))
}

/// Ratings outside 1..=5 are clamped, not rejected.
pub fn clamp_rating(rating: i32) -> i16 {
    rating.clamp(1, 5) as i16
}
