//! Provider-backed structured extraction.
//!
//! The completion provider is asked for a JSON object matching the `Profile`
//! schema. Model output routinely arrives wrapped in prose or code fences, so
//! the response is scanned for exactly one top-level `{...}` span with a
//! bracket-depth walk before being validated. A payload that cannot be
//! coerced into a `Profile` is an error — stale or partial data is never
//! returned in its place.

use thiserror::Error;
use tracing::debug;

use crate::llm_client::{CompletionProvider, ProviderError};
use crate::profile::prompts::RESUME_PARSE_PROMPT_TEMPLATE;
use crate::profile::{normalize_tech_stack, Profile};

const PARSE_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("resume text is empty")]
    EmptyInput,

    #[error("completion provider unavailable: {0}")]
    Provider(#[from] ProviderError),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),
}

/// Parses raw resume text into a validated `Profile` via the provider.
pub async fn parse_resume(
    text: &str,
    provider: &dyn CompletionProvider,
) -> Result<Profile, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", text);
    let raw = provider.complete(&prompt, PARSE_TEMPERATURE).await?;
    debug!("structured parse: provider returned {} bytes", raw.len());

    let span = json_object_span(&raw)?;
    let mut profile: Profile = serde_json::from_str(span).map_err(|e| {
        ParseError::SchemaValidation(format!("payload does not match the candidate schema: {e}"))
    })?;
    profile.tech_stack = normalize_tech_stack(profile.tech_stack);
    Ok(profile)
}

/// Locates the single top-level JSON object in `raw`.
///
/// Bracket-depth scan, aware of strings and escapes, so an inner `}` never
/// truncates the span. More than one complete top-level object is rejected.
fn json_object_span(raw: &str) -> Result<&str, ParseError> {
    let Some((start, end)) = find_balanced_object(raw, 0) else {
        return Err(ParseError::SchemaValidation(
            "no complete JSON object in provider output".to_string(),
        ));
    };
    if find_balanced_object(raw, end).is_some() {
        return Err(ParseError::SchemaValidation(
            "multiple top-level JSON objects in provider output".to_string(),
        ));
    }
    Ok(&raw[start..end])
}

/// Returns the byte range of the first balanced `{...}` at or after `from`.
fn find_balanced_object(raw: &str, from: usize) -> Option<(usize, usize)> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[from..].char_indices() {
        let i = from + offset;
        match start {
            None => {
                if c == '{' {
                    start = Some(i);
                    depth = 1;
                }
            }
            Some(s) => {
                if in_string {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        in_string = false;
                    }
                    continue;
                }
                match c {
                    '"' => in_string = true,
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some((s, i + 1));
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::MockProvider;

    const VALID_JSON: &str = r#"{
        "name": "Jane Doe",
        "email": "jane@example.com",
        "phone": "+1 555 0100",
        "location": "Berlin, Germany",
        "years_experience": 6,
        "tech_stack": ["Python", "python", "Docker"],
        "desired_positions": ["Backend Engineer"],
        "projects": [
            {"name": "Crawler", "description": "news crawler", "technologies": ["Python"]}
        ]
    }"#;

    #[test]
    fn test_span_plain_object() {
        assert_eq!(json_object_span(r#"{"a": 1}"#).unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_span_skips_surrounding_prose() {
        let raw = "Sure! Here is the JSON you asked for:\n{\"a\": 1}\nLet me know.";
        assert_eq!(json_object_span(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_span_keeps_nested_objects_whole() {
        let raw = r#"{"outer": {"inner": 1}, "b": 2}"#;
        assert_eq!(json_object_span(raw).unwrap(), raw);
    }

    #[test]
    fn test_span_ignores_braces_inside_strings() {
        let raw = r#"{"a": "closing } brace and \" quote", "b": 2}"#;
        assert_eq!(json_object_span(raw).unwrap(), raw);
    }

    #[test]
    fn test_span_handles_code_fences() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(json_object_span(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_span_rejects_missing_object() {
        assert!(json_object_span("no json here").is_err());
    }

    #[test]
    fn test_span_rejects_unterminated_object() {
        assert!(json_object_span(r#"{"a": {"b": 1}"#).is_err());
    }

    #[test]
    fn test_span_rejects_multiple_top_level_objects() {
        let err = json_object_span(r#"{"a": 1} {"b": 2}"#).unwrap_err();
        assert!(matches!(err, ParseError::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_parse_valid_payload() {
        let provider = MockProvider::always(VALID_JSON);
        let profile = parse_resume("resume text", &provider).await.unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.email, "jane@example.com");
        assert_eq!(profile.years_experience, 6);
        // case-insensitive de-dup, first-seen order
        assert_eq!(profile.tech_stack, vec!["Python", "Docker"]);
        assert_eq!(profile.projects.len(), 1);
        assert_eq!(profile.projects[0].name, "Crawler");
    }

    #[tokio::test]
    async fn test_parse_payload_wrapped_in_prose() {
        let wrapped = format!("Here you go:\n{VALID_JSON}\nHope that helps!");
        let provider = MockProvider::always(&wrapped);
        let profile = parse_resume("resume text", &provider).await.unwrap();
        assert_eq!(profile.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_parse_missing_email_is_schema_error() {
        let provider = MockProvider::always(
            r#"{"name": "x", "phone": "", "years_experience": 2, "tech_stack": []}"#,
        );
        let err = parse_resume("resume text", &provider).await.unwrap_err();
        assert!(matches!(err, ParseError::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_parse_wrong_field_type_is_schema_error() {
        let provider = MockProvider::always(
            r#"{"name": "x", "email": "x@y.z", "phone": "", "years_experience": 2, "tech_stack": "python"}"#,
        );
        let err = parse_resume("resume text", &provider).await.unwrap_err();
        assert!(matches!(err, ParseError::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_parse_clamps_years() {
        let provider = MockProvider::always(
            r#"{"name": "x", "email": "x@y.z", "phone": "", "years_experience": 120, "tech_stack": []}"#,
        );
        let profile = parse_resume("resume text", &provider).await.unwrap();
        assert_eq!(profile.years_experience, 60);
    }

    #[tokio::test]
    async fn test_parse_blank_input_never_calls_provider() {
        let provider = MockProvider::always(VALID_JSON);
        let err = parse_resume("   \n\t", &provider).await.unwrap_err();
        assert!(matches!(err, ParseError::EmptyInput));
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_parse_provider_failure_surfaces() {
        let provider =
            MockProvider::scripted(vec![Err(ProviderError::Exhausted { attempts: 2 })]);
        let err = parse_resume("resume text", &provider).await.unwrap_err();
        assert!(matches!(err, ParseError::Provider(_)));
    }
}
