//! Candidate profile schema shared by every extraction path.
//!
//! Both the heuristic autofill and the provider-backed structured parser
//! produce values of these types; validation happens once, at this boundary,
//! instead of ad hoc at each read site.

pub mod handlers;
pub mod heuristic;
pub mod prompts;
pub mod reconcile;
pub mod structured;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on declared experience; anything above is clamped, not rejected.
pub const MAX_YEARS_EXPERIENCE: u8 = 60;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+$").expect("email pattern")
});

/// The canonical candidate record.
///
/// `name`, `email`, `phone`, `years_experience` and `tech_stack` are required
/// when deserializing provider output; the remaining fields default when
/// absent. `years_experience` is clamped into `0..=60` at this boundary and
/// never re-checked at use sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(deserialize_with = "deserialize_years")]
    pub years_experience: u8,
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub desired_positions: Vec<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

impl Profile {
    /// A profile may be persisted only once it carries a grammar-valid email.
    pub fn persistable(&self) -> bool {
        is_valid_email(&self.email)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn clamp_years(years: i64) -> u8 {
    years.clamp(0, i64::from(MAX_YEARS_EXPERIENCE)) as u8
}

fn deserialize_years<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let years = i64::deserialize(deserializer)?;
    Ok(clamp_years(years))
}

/// Case-insensitive de-duplication preserving first-seen order. Entries are
/// trimmed and empties dropped.
pub fn normalize_tech_stack(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for entry in entries {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_passes() {
        assert!(is_valid_email("jane.doe+hiring@example-mail.co.uk"));
    }

    #[test]
    fn test_empty_email_fails() {
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_email_without_domain_fails() {
        assert!(!is_valid_email("jane.doe@"));
        assert!(!is_valid_email("jane.doe"));
    }

    #[test]
    fn test_email_with_spaces_fails() {
        assert!(!is_valid_email("jane doe@example.com"));
    }

    #[test]
    fn test_clamp_years_bounds() {
        assert_eq!(clamp_years(-3), 0);
        assert_eq!(clamp_years(0), 0);
        assert_eq!(clamp_years(42), 42);
        assert_eq!(clamp_years(60), 60);
        assert_eq!(clamp_years(100), 60);
    }

    #[test]
    fn test_normalize_dedups_case_insensitively() {
        let stack = vec![
            "Python".to_string(),
            "python".to_string(),
            "Docker".to_string(),
            "PYTHON".to_string(),
        ];
        assert_eq!(normalize_tech_stack(stack), vec!["Python", "Docker"]);
    }

    #[test]
    fn test_normalize_keeps_first_seen_order() {
        let stack = vec!["docker".to_string(), "python".to_string(), "docker".to_string()];
        assert_eq!(normalize_tech_stack(stack), vec!["docker", "python"]);
    }

    #[test]
    fn test_normalize_drops_blank_entries() {
        let stack = vec!["  ".to_string(), "rust".to_string(), "".to_string()];
        assert_eq!(normalize_tech_stack(stack), vec!["rust"]);
    }

    #[test]
    fn test_profile_persistable_requires_email() {
        let mut profile = Profile::default();
        assert!(!profile.persistable());
        profile.email = "jane@example.com".to_string();
        assert!(profile.persistable());
    }

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let json = r#"{
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "+1 555 0100",
            "years_experience": 7,
            "tech_stack": ["Rust", "Postgres"]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.location, "");
        assert!(profile.desired_positions.is_empty());
        assert!(profile.projects.is_empty());
        assert_eq!(profile.years_experience, 7);
    }

    #[test]
    fn test_profile_years_clamped_on_deserialize() {
        let json = r#"{
            "name": "x", "email": "x@y.z", "phone": "",
            "years_experience": 99, "tech_stack": []
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.years_experience, MAX_YEARS_EXPERIENCE);
    }

    #[test]
    fn test_profile_missing_email_is_an_error() {
        let json = r#"{"name": "x", "phone": "", "years_experience": 1, "tech_stack": []}"#;
        assert!(serde_json::from_str::<Profile>(json).is_err());
    }
}
