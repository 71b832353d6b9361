use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub time_limit_secs: u64,
    pub violation_limit: u32,
    /// Delay between the final violation warning and termination
    pub violation_grace: Duration,
    /// Simulated round trip of a submission
    pub submit_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 3600,
            violation_limit: 3,
            violation_grace: Duration::from_millis(2000),
            submit_delay: Duration::from_millis(1500),
        }
    }
}

/// Which question set (and UI) a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    #[strum(serialize = "mcq")]
    Mcq,
    #[strum(serialize = "coding")]
    Coding,
}

impl TestType {
    pub fn label(&self) -> &'static str {
        match self {
            TestType::Mcq => "MCQ Test",
            TestType::Coding => "Coding Test",
        }
    }
}

impl FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq" => Ok(TestType::Mcq),
            "coding" => Ok(TestType::Coding),
            other => Err(other.to_string()),
        }
    }
}

/// Lifecycle of one controller instance. `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum QuestionStatus {
    #[strum(serialize = "unanswered")]
    Unanswered,
    #[strum(serialize = "answered")]
    Answered,
    #[strum(serialize = "flagged-for-review")]
    FlaggedForReview,
}

/// Per-question answer record. The review flag is kept next to the answer
/// so that un-flagging never loses a recorded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestionProgress {
    pub answer: Option<usize>,
    pub flagged: bool,
}

impl QuestionProgress {
    pub fn status(&self) -> QuestionStatus {
        match (self.flagged, self.answer) {
            (true, _) => QuestionStatus::FlaggedForReview,
            (false, Some(_)) => QuestionStatus::Answered,
            (false, None) => QuestionStatus::Unanswered,
        }
    }
}

/// Counts shown in the question navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub answered: usize,
    pub unanswered: usize,
    pub marked: usize,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub test_type: Option<TestType>,
    pub phase: Phase,
    pub is_full_screen: bool,
    pub time_remaining_secs: u64,
    pub violation_count: u32,
    pub current_question_index: usize,
    /// Keyed by MCQ question id
    pub mcq_progress: BTreeMap<u32, QuestionProgress>,
    pub code_text: String,
    /// Keyed by test-case position within the current coding question
    pub test_results: BTreeMap<usize, bool>,
    pub is_submitting: bool,
}

impl SessionState {
    pub fn new<I>(time_limit_secs: u64, mcq_ids: I, code_text: String) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self {
            test_type: None,
            phase: Phase::Idle,
            is_full_screen: false,
            time_remaining_secs: time_limit_secs,
            violation_count: 0,
            current_question_index: 0,
            mcq_progress: mcq_ids
                .into_iter()
                .map(|id| (id, QuestionProgress::default()))
                .collect(),
            code_text,
            test_results: BTreeMap::new(),
            is_submitting: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn answer(&self, question_id: u32) -> Option<usize> {
        self.mcq_progress.get(&question_id).and_then(|p| p.answer)
    }

    pub fn status(&self, question_id: u32) -> QuestionStatus {
        self.mcq_progress
            .get(&question_id)
            .map(QuestionProgress::status)
            .unwrap_or(QuestionStatus::Unanswered)
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.mcq_progress
            .values()
            .fold(StatusCounts::default(), |mut acc, p| {
                match p.status() {
                    QuestionStatus::Answered => acc.answered += 1,
                    QuestionStatus::Unanswered => acc.unanswered += 1,
                    QuestionStatus::FlaggedForReview => acc.marked += 1,
                }
                acc
            })
    }

    pub fn passed_tests(&self) -> usize {
        self.test_results.values().filter(|passed| **passed).count()
    }
}
