use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::profile::{clamp_years, Profile};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub years_experience: i16,
    pub tech_stack: Vec<String>,
    pub desired_positions: Vec<String>,
    pub projects: Value,
    pub created_at: DateTime<Utc>,
}

impl From<CandidateRow> for Profile {
    fn from(row: CandidateRow) -> Self {
        Profile {
            name: row.name,
            email: row.email,
            phone: row.phone,
            location: row.location,
            years_experience: clamp_years(i64::from(row.years_experience)),
            tech_stack: row.tech_stack,
            desired_positions: row.desired_positions,
            projects: serde_json::from_value(row.projects).unwrap_or_default(),
        }
    }
}
