//! Interview session state machine.
//!
//! All transitions are synchronous and driven by the host: an explicit
//! command (`begin`, `submit_answer`, `reset`) or a periodic `tick` poll.
//! There is no background timer. Auto-advance resolution is therefore
//! bounded by the host's poll cadence (`TICK_POLL_INTERVAL_SECS`), which the
//! host reports to clients alongside the session snapshot.
//!
//! Invariants: `answers.len() == current_index` between calls;
//! `current_index` never decreases; the session is `Completed` exactly when
//! every question has been answered or timed out.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::interview::{QuestionCategory, QuestionItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    AwaitingConsent,
    InProgress,
    Completed,
}

/// Stage as seen by the client. Follows the category of the current question,
/// since the bank is category-ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    Tech,
    Project,
    Role,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerRecord {
    pub question: QuestionItem,
    pub answer: String,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("interview already started")]
    AlreadyStarted,

    #[error("question bank is empty")]
    EmptyQuestionBank,

    #[error("interview is not awaiting consent")]
    NotAwaitingConsent,

    #[error("consent has not been granted")]
    ConsentRequired,
}

/// Result of a `tick` poll. `Inactive` is a reported no-op, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Inactive,
    Waiting { remaining: Duration },
    AutoAdvanced { recorded: AnswerRecord, completed: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Inactive,
    Recorded { recorded: AnswerRecord, completed: bool },
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub stage: Option<InterviewStage>,
    pub current_index: usize,
    pub total_questions: usize,
    pub current_question: Option<QuestionItem>,
    pub remaining_secs: Option<u64>,
    pub answers_recorded: usize,
}

#[derive(Debug)]
pub struct InterviewSession {
    questions: Vec<QuestionItem>,
    phase: SessionPhase,
    current_index: usize,
    started_at: Option<Instant>,
    time_limit: Duration,
    draft: String,
    // Guards against double-recording the same index: recording is gated on
    // this flag, not on elapsed time.
    answered_current: bool,
    answers: Vec<AnswerRecord>,
}

impl InterviewSession {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            questions: Vec::new(),
            phase: SessionPhase::NotStarted,
            current_index: 0,
            started_at: None,
            time_limit,
            draft: String::new(),
            answered_current: false,
            answers: Vec::new(),
        }
    }

    /// Loads the question bank and moves to `AwaitingConsent`.
    pub fn start(&mut self, questions: Vec<QuestionItem>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionBank);
        }
        self.questions = questions;
        self.phase = SessionPhase::AwaitingConsent;
        Ok(())
    }

    /// Starts the timed question loop. Valid only from `AwaitingConsent`,
    /// and only with consent granted.
    pub fn begin(&mut self, consent: bool, now: Instant) -> Result<(), SessionError> {
        if self.phase != SessionPhase::AwaitingConsent {
            return Err(SessionError::NotAwaitingConsent);
        }
        if !consent {
            return Err(SessionError::ConsentRequired);
        }
        self.phase = SessionPhase::InProgress;
        self.current_index = 0;
        self.started_at = Some(now);
        self.answered_current = false;
        self.draft.clear();
        Ok(())
    }

    /// Stores the in-progress answer text for the current question. Returns
    /// false (a reported no-op) outside `InProgress`.
    pub fn update_draft(&mut self, text: String) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        self.draft = text;
        true
    }

    /// Periodic poll. When the time limit has elapsed and the current index
    /// has not yet been recorded, records the draft buffer (possibly blank)
    /// exactly once and advances. Idempotent within a poll interval.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.phase != SessionPhase::InProgress {
            return TickOutcome::Inactive;
        }
        let Some(started) = self.started_at else {
            return TickOutcome::Inactive;
        };

        let elapsed = now.saturating_duration_since(started);
        if elapsed < self.time_limit || self.answered_current {
            return TickOutcome::Waiting {
                remaining: self.time_limit.saturating_sub(elapsed),
            };
        }

        let answer = std::mem::take(&mut self.draft);
        let recorded = self.record_and_advance(answer, now);
        TickOutcome::AutoAdvanced {
            recorded,
            completed: self.phase == SessionPhase::Completed,
        }
    }

    /// Records an explicit answer for the current question and advances.
    /// Mutually exclusive with the auto-advance path for the same index.
    pub fn submit_answer(&mut self, answer: String, now: Instant) -> SubmitOutcome {
        if self.phase != SessionPhase::InProgress || self.answered_current {
            return SubmitOutcome::Inactive;
        }
        let recorded = self.record_and_advance(answer, now);
        SubmitOutcome::Recorded {
            recorded,
            completed: self.phase == SessionPhase::Completed,
        }
    }

    /// Clears everything back to `NotStarted`.
    pub fn reset(&mut self) {
        *self = Self::new(self.time_limit);
    }

    fn record_and_advance(&mut self, answer: String, now: Instant) -> AnswerRecord {
        self.answered_current = true;
        let record = AnswerRecord {
            question: self.questions[self.current_index].clone(),
            answer,
            answered_at: Utc::now(),
        };
        self.answers.push(record.clone());
        self.current_index += 1;
        self.draft.clear();
        self.answered_current = false;
        if self.current_index == self.questions.len() {
            self.phase = SessionPhase::Completed;
            self.started_at = None;
        } else {
            self.started_at = Some(now);
        }
        record
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stage(&self) -> Option<InterviewStage> {
        match self.phase {
            SessionPhase::Completed => Some(InterviewStage::Completed),
            SessionPhase::InProgress => self.current_question().map(|q| match q.category {
                QuestionCategory::Tech => InterviewStage::Tech,
                QuestionCategory::Project => InterviewStage::Project,
                QuestionCategory::Role => InterviewStage::Role,
            }),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&QuestionItem> {
        self.questions.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match (self.phase, self.started_at) {
            (SessionPhase::InProgress, Some(started)) => Some(
                self.time_limit
                    .saturating_sub(now.saturating_duration_since(started)),
            ),
            _ => None,
        }
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            stage: self.stage(),
            current_index: self.current_index(),
            total_questions: self.total_questions(),
            current_question: self.current_question().cloned(),
            remaining_secs: self.remaining(now).map(|d| d.as_secs()),
            answers_recorded: self.answers().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: Duration = Duration::from_secs(120);

    fn bank() -> Vec<QuestionItem> {
        vec![
            QuestionItem::new("tech one?", QuestionCategory::Tech),
            QuestionItem::new("tech two?", QuestionCategory::Tech),
            QuestionItem::new("project one?", QuestionCategory::Project),
            QuestionItem::new("role one?", QuestionCategory::Role),
            QuestionItem::new("role two?", QuestionCategory::Role),
        ]
    }

    fn in_progress() -> (InterviewSession, Instant) {
        let mut session = InterviewSession::new(LIMIT);
        session.start(bank()).unwrap();
        let t0 = Instant::now();
        session.begin(true, t0).unwrap();
        (session, t0)
    }

    #[test]
    fn test_start_moves_to_awaiting_consent() {
        let mut session = InterviewSession::new(LIMIT);
        session.start(bank()).unwrap();
        assert_eq!(session.phase(), SessionPhase::AwaitingConsent);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut session = InterviewSession::new(LIMIT);
        session.start(bank()).unwrap();
        assert_eq!(session.start(bank()), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn test_start_rejects_empty_bank() {
        let mut session = InterviewSession::new(LIMIT);
        assert_eq!(session.start(vec![]), Err(SessionError::EmptyQuestionBank));
        assert_eq!(session.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_begin_requires_consent() {
        let mut session = InterviewSession::new(LIMIT);
        session.start(bank()).unwrap();
        assert_eq!(
            session.begin(false, Instant::now()),
            Err(SessionError::ConsentRequired)
        );
        assert_eq!(session.phase(), SessionPhase::AwaitingConsent);
        session.begin(true, Instant::now()).unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn test_begin_before_start_is_rejected() {
        let mut session = InterviewSession::new(LIMIT);
        assert_eq!(
            session.begin(true, Instant::now()),
            Err(SessionError::NotAwaitingConsent)
        );
    }

    #[test]
    fn test_submit_outside_in_progress_is_reported_noop() {
        let mut session = InterviewSession::new(LIMIT);
        let outcome = session.submit_answer("hello".to_string(), Instant::now());
        assert_eq!(outcome, SubmitOutcome::Inactive);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_tick_outside_in_progress_is_reported_noop() {
        let mut session = InterviewSession::new(LIMIT);
        assert_eq!(session.tick(Instant::now()), TickOutcome::Inactive);
    }

    #[test]
    fn test_n_submits_reach_completed() {
        let (mut session, t0) = in_progress();
        for i in 0..5 {
            let outcome = session.submit_answer(format!("answer {i}"), t0);
            assert!(matches!(outcome, SubmitOutcome::Recorded { .. }));
            assert_eq!(session.answers().len(), session.current_index());
        }
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.answers().len(), 5);

        // every question answered exactly once
        let mut texts: Vec<_> = session.answers().iter().map(|a| &a.question.text).collect();
        texts.dedup();
        assert_eq!(texts.len(), 5);
    }

    #[test]
    fn test_no_answers_accepted_after_completion() {
        let (mut session, t0) = in_progress();
        for i in 0..5 {
            session.submit_answer(format!("answer {i}"), t0);
        }
        assert_eq!(
            session.submit_answer("extra".to_string(), t0),
            SubmitOutcome::Inactive
        );
        assert_eq!(session.tick(t0 + LIMIT * 3), TickOutcome::Inactive);
        assert_eq!(session.answers().len(), 5);
    }

    #[test]
    fn test_tick_before_limit_waits() {
        let (mut session, t0) = in_progress();
        let outcome = session.tick(t0 + LIMIT - Duration::from_secs(1));
        assert!(matches!(outcome, TickOutcome::Waiting { remaining } if remaining > Duration::ZERO));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_tick_after_limit_auto_advances_with_draft() {
        let (mut session, t0) = in_progress();
        assert!(session.update_draft("half-typed thought".to_string()));
        let outcome = session.tick(t0 + LIMIT);
        match outcome {
            TickOutcome::AutoAdvanced { recorded, completed } => {
                assert_eq!(recorded.answer, "half-typed thought");
                assert!(!completed);
            }
            other => panic!("expected auto-advance, got {other:?}"),
        }
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_tick_records_blank_answer_when_no_draft() {
        let (mut session, t0) = in_progress();
        let outcome = session.tick(t0 + LIMIT);
        match outcome {
            TickOutcome::AutoAdvanced { recorded, .. } => assert_eq!(recorded.answer, ""),
            other => panic!("expected auto-advance, got {other:?}"),
        }
    }

    #[test]
    fn test_double_tick_does_not_double_record() {
        let (mut session, t0) = in_progress();
        let deadline = t0 + LIMIT;
        assert!(matches!(session.tick(deadline), TickOutcome::AutoAdvanced { .. }));
        // second poll with the same timestamp: timer was re-armed at the
        // deadline, so the next question has its full budget
        assert!(matches!(session.tick(deadline), TickOutcome::Waiting { .. }));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn test_submit_resets_timer() {
        let (mut session, t0) = in_progress();
        let submit_at = t0 + Duration::from_secs(30);
        session.submit_answer("quick answer".to_string(), submit_at);
        // old deadline passes without effect; new deadline is submit_at + LIMIT
        assert!(matches!(session.tick(t0 + LIMIT), TickOutcome::Waiting { .. }));
        assert!(matches!(
            session.tick(submit_at + LIMIT),
            TickOutcome::AutoAdvanced { .. }
        ));
    }

    #[test]
    fn test_mixed_submits_and_timeouts_complete_in_n_actions() {
        let (mut session, t0) = in_progress();
        let mut now = t0;
        let mut actions = 0;
        // alternate explicit answers and timeouts
        for i in 0..5 {
            if i % 2 == 0 {
                session.submit_answer(format!("answer {i}"), now);
            } else {
                now += LIMIT;
                assert!(matches!(session.tick(now), TickOutcome::AutoAdvanced { .. }));
            }
            actions += 1;
        }
        assert_eq!(actions, 5);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.answers().len(), 5);
    }

    #[test]
    fn test_stage_follows_question_categories() {
        let (mut session, t0) = in_progress();
        assert_eq!(session.stage(), Some(InterviewStage::Tech));
        session.submit_answer("a".to_string(), t0);
        assert_eq!(session.stage(), Some(InterviewStage::Tech));
        session.submit_answer("b".to_string(), t0);
        assert_eq!(session.stage(), Some(InterviewStage::Project));
        session.submit_answer("c".to_string(), t0);
        assert_eq!(session.stage(), Some(InterviewStage::Role));
        session.submit_answer("d".to_string(), t0);
        assert_eq!(session.stage(), Some(InterviewStage::Role));
        session.submit_answer("e".to_string(), t0);
        assert_eq!(session.stage(), Some(InterviewStage::Completed));
    }

    #[test]
    fn test_update_draft_outside_in_progress_is_reported() {
        let mut session = InterviewSession::new(LIMIT);
        assert!(!session.update_draft("text".to_string()));
    }

    #[test]
    fn test_reset_from_every_phase() {
        // not started
        let mut session = InterviewSession::new(LIMIT);
        session.reset();
        assert_eq!(session.phase(), SessionPhase::NotStarted);

        // awaiting consent
        let mut session = InterviewSession::new(LIMIT);
        session.start(bank()).unwrap();
        session.reset();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.total_questions(), 0);

        // in progress
        let (mut session, t0) = in_progress();
        session.submit_answer("a".to_string(), t0);
        session.reset();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert!(session.answers().is_empty());
        assert_eq!(session.current_index(), 0);

        // completed
        let (mut session, t0) = in_progress();
        for _ in 0..5 {
            session.submit_answer("a".to_string(), t0);
        }
        session.reset();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.total_questions(), 0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_reset_allows_a_fresh_start() {
        let (mut session, _) = in_progress();
        session.reset();
        session.start(bank()).unwrap();
        assert_eq!(session.phase(), SessionPhase::AwaitingConsent);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (session, t0) = in_progress();
        let snapshot = session.snapshot(t0 + Duration::from_secs(20));
        assert_eq!(snapshot.phase, SessionPhase::InProgress);
        assert_eq!(snapshot.total_questions, 5);
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.remaining_secs, Some(100));
        assert_eq!(snapshot.current_question.unwrap().text, "tech one?");
    }

    #[test]
    fn test_remaining_is_none_when_not_in_progress() {
        let session = InterviewSession::new(LIMIT);
        assert_eq!(session.remaining(Instant::now()), None);
    }
}
