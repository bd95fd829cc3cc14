//! Builds the ordered interview question bank from a reconciled profile.
//!
//! Bank order is fixed: technical questions, then project questions, then
//! role questions. Sampling is uniform without replacement; no run-to-run
//! reproducibility is promised. A category whose provider call fails (after
//! the client's retry) degrades to its generic fallback question so the
//! session stays usable.

use rand::seq::SliceRandom;
use tracing::warn;

use crate::interview::prompts::{
    PROJECT_QUESTION_PROMPT_TEMPLATE, ROLE_QUESTIONS_PROMPT_TEMPLATE,
    TECH_QUESTIONS_PROMPT_TEMPLATE,
};
use crate::interview::{QuestionCategory, QuestionItem};
use crate::llm_client::CompletionProvider;
use crate::profile::{Profile, Project};

const MAX_TECH_QUESTIONS: usize = 2;
const MAX_PROJECT_QUESTIONS: usize = 2;
const ROLE_QUESTION_COUNT: usize = 2;
/// Lines shorter than this are list-numbering noise, not questions.
const MIN_QUESTION_LEN: usize = 12;
const QUESTION_TEMPERATURE: f32 = 0.7;

const TECH_FALLBACK_QUESTION: &str =
    "Walk me through the technology you know best. What have you built with it?";
const PROJECT_FALLBACK_QUESTION: &str =
    "Describe a project you are proud of. What was your role and what challenges did you face?";
const ROLE_FALLBACK_QUESTIONS: &[&str] = &[
    "What kind of role are you looking for next, and why?",
    "Tell me about a time you had to learn something new under pressure.",
];
const DEFAULT_ROLE_LABEL: &str = "software engineer";

pub async fn build_question_bank(
    profile: &Profile,
    provider: &dyn CompletionProvider,
) -> Vec<QuestionItem> {
    let mut bank = Vec::new();
    bank.extend(tech_questions(profile, provider).await);
    bank.extend(project_questions(profile, provider).await);
    bank.extend(role_questions(profile, provider).await);
    bank
}

async fn tech_questions(profile: &Profile, provider: &dyn CompletionProvider) -> Vec<QuestionItem> {
    if profile.tech_stack.is_empty() {
        return vec![QuestionItem::new(TECH_FALLBACK_QUESTION, QuestionCategory::Tech)];
    }

    let picks = sample(&profile.tech_stack, MAX_TECH_QUESTIONS);
    let prompt = TECH_QUESTIONS_PROMPT_TEMPLATE
        .replace("{count}", &MAX_TECH_QUESTIONS.to_string())
        .replace("{techs}", &picks.join(", "));

    let questions = match provider.complete(&prompt, QUESTION_TEMPERATURE).await {
        Ok(raw) => filter_question_lines(&raw)
            .into_iter()
            .take(MAX_TECH_QUESTIONS)
            .map(|text| QuestionItem::new(text, QuestionCategory::Tech))
            .collect::<Vec<_>>(),
        Err(e) => {
            warn!("technical question generation failed: {e}");
            Vec::new()
        }
    };

    if questions.is_empty() {
        vec![QuestionItem::new(TECH_FALLBACK_QUESTION, QuestionCategory::Tech)]
    } else {
        questions
    }
}

async fn project_questions(
    profile: &Profile,
    provider: &dyn CompletionProvider,
) -> Vec<QuestionItem> {
    if profile.projects.is_empty() {
        return vec![QuestionItem::new(
            PROJECT_FALLBACK_QUESTION,
            QuestionCategory::Project,
        )];
    }

    let picks = sample(&profile.projects, MAX_PROJECT_QUESTIONS);
    let mut questions = Vec::new();
    for project in &picks {
        match project_question(project, provider).await {
            Some(text) => questions.push(QuestionItem::new(text, QuestionCategory::Project)),
            None => warn!("project question generation failed for '{}'", project.name),
        }
    }

    if questions.is_empty() {
        vec![QuestionItem::new(
            PROJECT_FALLBACK_QUESTION,
            QuestionCategory::Project,
        )]
    } else {
        questions
    }
}

async fn project_question(project: &Project, provider: &dyn CompletionProvider) -> Option<String> {
    let prompt = PROJECT_QUESTION_PROMPT_TEMPLATE
        .replace("{name}", &project.name)
        .replace("{description}", &project.description)
        .replace("{technologies}", &project.technologies.join(", "));

    let raw = provider.complete(&prompt, QUESTION_TEMPERATURE).await.ok()?;
    filter_question_lines(&raw).into_iter().next()
}

async fn role_questions(profile: &Profile, provider: &dyn CompletionProvider) -> Vec<QuestionItem> {
    let role = profile
        .desired_positions
        .iter()
        .map(|p| p.trim())
        .find(|p| !p.is_empty())
        .unwrap_or(DEFAULT_ROLE_LABEL);

    let prompt = ROLE_QUESTIONS_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{count}", &ROLE_QUESTION_COUNT.to_string());

    let questions = match provider.complete(&prompt, QUESTION_TEMPERATURE).await {
        Ok(raw) => filter_question_lines(&raw)
            .into_iter()
            .take(ROLE_QUESTION_COUNT)
            .map(|text| QuestionItem::new(text, QuestionCategory::Role))
            .collect::<Vec<_>>(),
        Err(e) => {
            warn!("role question generation failed: {e}");
            Vec::new()
        }
    };

    if questions.is_empty() {
        ROLE_FALLBACK_QUESTIONS
            .iter()
            .map(|q| QuestionItem::new(*q, QuestionCategory::Role))
            .collect()
    } else {
        questions
    }
}

fn sample<T: Clone>(items: &[T], amount: usize) -> Vec<T> {
    let mut rng = rand::thread_rng();
    items
        .choose_multiple(&mut rng, amount.min(items.len()))
        .cloned()
        .collect()
}

/// Splits provider output into candidate questions: strips list markers,
/// drops blank, purely non-alphabetic and too-short lines.
fn filter_question_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(strip_list_marker)
        .filter(|line| line.len() >= MIN_QUESTION_LEN)
        .filter(|line| line.chars().any(char::is_alphabetic))
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let mut rest = line.trim();
    for marker in ["-", "*", "•"] {
        if let Some(stripped) = rest.strip_prefix(marker) {
            rest = stripped.trim_start();
            break;
        }
    }
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if (1..=2).contains(&digits) {
        let after = &rest[digits..];
        if let Some(stripped) = after.strip_prefix('.').or_else(|| after.strip_prefix(')')) {
            rest = stripped.trim_start();
        }
    }
    rest
}
