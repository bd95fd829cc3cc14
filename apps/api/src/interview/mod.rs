pub mod handlers;
pub mod prompts;
pub mod question_bank;
pub mod session;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Tech,
    Project,
    Role,
}

/// A single interview question. The bank is ordered by category:
/// technical, then project, then role questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub text: String,
    pub category: QuestionCategory,
}

impl QuestionItem {
    pub fn new(text: impl Into<String>, category: QuestionCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}
