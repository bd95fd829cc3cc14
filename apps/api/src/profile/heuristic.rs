//! Deterministic autofill — regex and keyword extraction from raw resume text.
//!
//! Never fails and performs no I/O: a field without a match yields its
//! default. Used both as the instant-preview path for uploads and as the
//! fallback when structured extraction is unavailable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::profile::clamp_years;

/// Keyword vocabulary for tech-stack detection. Matched as substrings of the
/// lower-cased text.
pub const TECH_KEYWORDS: &[&str] = &[
    "python",
    "django",
    "flask",
    "fastapi",
    "javascript",
    "typescript",
    "react",
    "angular",
    "vue",
    "node",
    "express",
    "java",
    "spring",
    "kotlin",
    "golang",
    "go",
    "c#",
    "c++",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "postgres",
    "mysql",
    "mongodb",
    "redis",
    "graphql",
    "rest",
    "sql",
    "tensorflow",
    "pytorch",
    "keras",
    "spark",
];

static EMAIL_SCAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+").expect("email scan pattern")
});

// Loose on purpose: optional country code, optional area code, 6-15 digits
// with space/hyphen separators.
static PHONE_SCAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+\d{1,3}[\s-]?)?(\(?\d{2,4}\)?[\s-]?)?[\d\s-]{6,15}").expect("phone scan pattern")
});

static YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\+?\s+years").expect("years pattern"));

/// The subset of profile fields the heuristic pass can fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub years_experience: u8,
    pub tech_stack: Vec<String>,
}

/// Extracts whatever fields pattern matching can find in `text`.
pub fn extract_autofill(text: &str) -> PartialProfile {
    let lowered = text.to_lowercase();

    let name = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string();

    let email = EMAIL_SCAN_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let phone = PHONE_SCAN_RE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let years_experience = YEARS_RE
        .captures(&lowered)
        .and_then(|c| c[1].parse::<i64>().ok())
        .map(clamp_years)
        .unwrap_or(0);

    PartialProfile {
        name,
        email,
        phone,
        location: String::new(),
        years_experience,
        tech_stack: detect_tech_stack(&lowered),
    }
}

// Ordered by first occurrence position in the text, not by vocabulary order.
fn detect_tech_stack(lowered: &str) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = TECH_KEYWORDS
        .iter()
        .filter_map(|kw| lowered.find(kw).map(|pos| (pos, *kw)))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, kw)| kw.to_string()).collect()
}
