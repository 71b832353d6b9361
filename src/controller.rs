use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::grader::Grader;
use crate::questions::{CodingQuestion, McqQuestion, QuestionBank};
use crate::route::Route;
use crate::session::{Phase, SessionConfig, SessionState, TestType};

const MS_PER_TICK: u64 = 1000;

pub const TIME_UP_MESSAGE: &str = "Time's up! Your test has been submitted automatically.";
pub const SUBMITTED_MESSAGE: &str = "Test submitted successfully!";
pub const FULL_SCREEN_MESSAGE: &str = "Please remain in full-screen mode during the test.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the notice banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            level,
            message: message.into(),
            duration: Duration::from_millis(duration_ms),
        }
    }
}

/// Requests the controller leaves for the app to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notice),
    Navigate(Route),
    RequestFullScreen,
    ExitFullScreen,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("no active session")]
    NotActive,
}

/// Owns one exam session from start to end.
///
/// All mutation goes through the methods below; host signals and user input
/// are applied one at a time by whoever drives the controller. Time only
/// moves through [`SessionController::advance`] (or direct [`tick`] calls),
/// which keeps the countdown and the one-shot delays deterministic.
///
/// [`tick`]: SessionController::tick
pub struct SessionController {
    bank: Arc<QuestionBank>,
    grader: Box<dyn Grader>,
    config: SessionConfig,
    state: SessionState,
    clock_ms: u64,
    last_tick_ms: u64,
    finalize_at: Option<u64>,
    terminate_at: Option<u64>,
    torn_down: bool,
    effects: Vec<Effect>,
    /// Editor text of coding questions that are not on screen
    drafts: BTreeMap<usize, String>,
}

impl SessionController {
    pub fn new(bank: Arc<QuestionBank>, grader: Box<dyn Grader>, config: SessionConfig) -> Self {
        let state = SessionState::new(
            config.time_limit_secs,
            bank.mcq.iter().map(|q| q.id),
            bank.starter_code(0).to_string(),
        );

        Self {
            bank,
            grader,
            config,
            state,
            clock_ms: 0,
            last_tick_ms: 0,
            finalize_at: None,
            terminate_at: None,
            torn_down: false,
            effects: Vec::new(),
            drafts: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Whether leaving now would lose progress
    pub fn warn_before_unload(&self) -> bool {
        self.is_active()
    }

    pub fn question_count(&self) -> usize {
        self.state
            .test_type
            .map_or(0, |t| self.bank.question_count(t))
    }

    pub fn current_mcq(&self) -> Option<&McqQuestion> {
        match self.state.test_type {
            Some(TestType::Mcq) => self.bank.mcq.get(self.state.current_question_index),
            _ => None,
        }
    }

    pub fn current_coding(&self) -> Option<&CodingQuestion> {
        match self.state.test_type {
            Some(TestType::Coding) => self.bank.coding.get(self.state.current_question_index),
            _ => None,
        }
    }

    pub fn has_pending_termination(&self) -> bool {
        self.terminate_at.is_some()
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>, duration_ms: u64) {
        self.effects
            .push(Effect::Notify(Notice::new(level, message, duration_ms)));
    }

    pub fn start_session(&mut self, test_type: TestType) {
        if self.torn_down {
            return;
        }
        match self.state.phase {
            Phase::Ended => {
                warn!(%test_type, "start ignored: session already ended");
                return;
            }
            Phase::Active => {
                debug!(%test_type, current = ?self.state.test_type, "start ignored: session already active");
                return;
            }
            Phase::Idle => {}
        }

        self.state.test_type = Some(test_type);
        self.state.phase = Phase::Active;
        self.state.is_full_screen = true;
        self.state.current_question_index = 0;
        if test_type == TestType::Coding {
            self.state.code_text = self.bank.starter_code(0).to_string();
            self.state.test_results.clear();
            self.drafts.clear();
        }
        self.last_tick_ms = self.clock_ms;

        info!(
            %test_type,
            time_limit_secs = self.state.time_remaining_secs,
            questions = self.question_count(),
            "session started"
        );
        self.effects.push(Effect::RequestFullScreen);
    }

    pub fn end_session(&mut self) {
        let was_active = self.state.is_active();
        self.state.is_full_screen = false;
        if !was_active {
            return;
        }

        self.state.phase = Phase::Ended;
        self.state.is_submitting = false;
        self.finalize_at = None;
        self.terminate_at = None;

        info!(
            time_remaining_secs = self.state.time_remaining_secs,
            violations = self.state.violation_count,
            "session ended"
        );
        self.effects.push(Effect::ExitFullScreen);
        self.effects.push(Effect::Navigate(Route::Submitted));
    }

    pub fn go_to_question(&mut self, index: usize) {
        let count = self.question_count();
        if index >= count {
            debug!(index, count, "navigation out of range ignored");
            return;
        }
        let from = self.state.current_question_index;
        if index != from && self.state.test_type == Some(TestType::Coding) {
            self.state.test_results.clear();
            let draft = self
                .drafts
                .remove(&index)
                .unwrap_or_else(|| self.bank.starter_code(index).to_string());
            let left = std::mem::replace(&mut self.state.code_text, draft);
            self.drafts.insert(from, left);
        }
        self.state.current_question_index = index;
    }

    pub fn next_question(&mut self) {
        self.go_to_question(self.state.current_question_index + 1);
    }

    pub fn prev_question(&mut self) {
        if let Some(index) = self.state.current_question_index.checked_sub(1) {
            self.go_to_question(index);
        }
    }

    pub fn answer_multiple_choice(&mut self, question_id: u32, option_index: usize) {
        if !self.is_active() || self.state.test_type != Some(TestType::Mcq) {
            debug!(question_id, "answer ignored: no active mcq session");
            return;
        }
        let Some(options) = self.bank.mcq_by_id(question_id).map(|q| q.options.len()) else {
            debug!(question_id, "answer ignored: unknown question");
            return;
        };
        if option_index >= options {
            debug!(question_id, option_index, options, "answer ignored: option out of range");
            return;
        }

        let progress = self.state.mcq_progress.entry(question_id).or_default();
        progress.answer = Some(option_index);
        progress.flagged = false;
    }

    pub fn toggle_review_flag(&mut self, question_id: u32) {
        if !self.is_active() || self.state.test_type != Some(TestType::Mcq) {
            return;
        }
        if let Some(progress) = self.state.mcq_progress.get_mut(&question_id) {
            progress.flagged = !progress.flagged;
        }
    }

    pub fn update_code(&mut self, text: impl Into<String>) {
        self.state.code_text = text.into();
    }

    pub fn run_tests(&mut self) {
        if !self.is_active() {
            debug!("run tests ignored: no active session");
            return;
        }
        let index = self.state.current_question_index;
        let bank = Arc::clone(&self.bank);
        let question = match self.state.test_type {
            Some(TestType::Coding) => bank.coding.get(index),
            _ => None,
        };
        let Some(question) = question else {
            debug!("run tests ignored: no coding question");
            return;
        };
        let verdicts = self.grader.evaluate(question, &self.state.code_text);
        let total = question.test_cases.len();

        // missing verdicts count as failures
        self.state.test_results = verdicts
            .into_iter()
            .chain(std::iter::repeat(false))
            .take(total)
            .enumerate()
            .collect();
        let passed = self.state.passed_tests();
        info!(question = index, passed, total, "tests run");
        self.notify(
            NoticeLevel::Info,
            format!("{} of {} tests passed!", passed, total),
            3000,
        );
    }

    pub fn submit_test(&mut self) -> Result<(), SessionError> {
        if self.state.is_submitting {
            debug!("submit rejected: already submitting");
            return Err(SessionError::AlreadySubmitting);
        }
        if !self.is_active() {
            debug!("submit rejected: session not active");
            return Err(SessionError::NotActive);
        }

        self.state.is_submitting = true;
        self.finalize_at = Some(self.clock_ms + self.config.submit_delay.as_millis() as u64);
        info!("submission started");
        Ok(())
    }

    /// One second of countdown
    pub fn tick(&mut self) {
        if self.torn_down || !self.is_active() {
            return;
        }
        self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
        if self.state.time_remaining_secs == 0 {
            warn!("time expired, auto-submitting");
            self.end_session();
            self.notify(NoticeLevel::Error, TIME_UP_MESSAGE, 4000);
        }
    }

    pub fn report_violation(&mut self) {
        if !self.is_active() || self.terminate_at.is_some() {
            return;
        }

        self.state.violation_count += 1;
        let count = self.state.violation_count;
        let limit = self.config.violation_limit;
        warn!(count, limit, "proctoring violation");

        if count < limit {
            self.notify(
                NoticeLevel::Warning,
                format!(
                    "Warning {}/{}: Switching tabs is not allowed during the test.",
                    count, limit
                ),
                4000,
            );
        } else {
            self.notify(
                NoticeLevel::Error,
                format!("You have been warned {} times. The test will now end.", limit),
                5000,
            );
            self.terminate_at =
                Some(self.clock_ms + self.config.violation_grace.as_millis() as u64);
        }
    }

    pub fn on_full_screen_changed(&mut self, is_full_screen: bool) {
        self.state.is_full_screen = is_full_screen;
        if !is_full_screen && self.is_active() {
            warn!("left full screen during active session");
            self.notify(NoticeLevel::Warning, FULL_SCREEN_MESSAGE, 3000);
        }
    }

    /// Move the session clock forward, issuing ticks and firing due one-shot
    /// actions in time order.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.torn_down {
            return;
        }
        let end = self.clock_ms + elapsed.as_millis() as u64;

        loop {
            let next_tick = self
                .is_active()
                .then_some(self.last_tick_ms + MS_PER_TICK);
            let next = [next_tick, self.finalize_at, self.terminate_at]
                .into_iter()
                .flatten()
                .min();
            let Some(at) = next.filter(|at| *at <= end) else {
                break;
            };
            self.clock_ms = at;

            if next_tick == Some(at) {
                self.last_tick_ms = at;
                self.tick();
            }
            if self.finalize_at.is_some_and(|t| t <= at) {
                self.finalize_at = None;
                self.finalize_submission();
            }
            if self.terminate_at.is_some_and(|t| t <= at) {
                self.terminate_at = None;
                info!("terminating session after repeated violations");
                self.end_session();
            }
        }

        self.clock_ms = end;
    }

    fn finalize_submission(&mut self) {
        self.notify(NoticeLevel::Success, SUBMITTED_MESSAGE, 2000);
        self.end_session();
        self.state.is_submitting = false;
    }

    /// Stop the countdown and drop pending actions. The controller ignores
    /// time from here on.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.finalize_at = None;
        self.terminate_at = None;
        debug!(phase = ?self.state.phase, "controller torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grader::ConstGrader;
    use crate::session::QuestionStatus;
    use assert_matches::assert_matches;

    fn controller() -> SessionController {
        let bank = Arc::new(QuestionBank::builtin().unwrap());
        SessionController::new(bank, Box::new(ConstGrader(true)), SessionConfig::default())
    }

    fn notices(effects: &[Effect]) -> Vec<&Notice> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn navigations(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::Navigate(Route::Submitted)))
            .count()
    }

    #[test]
    fn start_sets_active_state() {
        let mut c = controller();
        c.start_session(TestType::Mcq);

        assert!(c.is_active());
        assert!(c.state().is_full_screen);
        assert_eq!(c.state().test_type, Some(TestType::Mcq));
        assert_eq!(c.state().current_question_index, 0);
        assert_eq!(c.drain_effects(), vec![Effect::RequestFullScreen]);
    }

    #[test]
    fn start_while_active_is_noop() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.go_to_question(2);
        c.drain_effects();

        c.start_session(TestType::Coding);

        assert_eq!(c.state().test_type, Some(TestType::Mcq));
        assert_eq!(c.state().current_question_index, 2);
        assert!(c.drain_effects().is_empty());
    }

    #[test]
    fn start_after_end_is_ignored() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.end_session();

        c.start_session(TestType::Mcq);
        assert_eq!(c.phase(), Phase::Ended);
    }

    #[test]
    fn coding_start_resets_editor() {
        let mut c = controller();
        c.update_code("garbage");
        c.start_session(TestType::Coding);

        assert_eq!(c.state().code_text, c.bank().default_code);
    }

    #[test]
    fn end_navigates_once() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.drain_effects();

        c.end_session();
        c.end_session();

        let effects = c.drain_effects();
        assert_eq!(navigations(&effects), 1);
        assert!(effects.contains(&Effect::ExitFullScreen));
        assert_eq!(c.phase(), Phase::Ended);
        assert!(!c.state().is_full_screen);
    }

    #[test]
    fn end_while_idle_has_no_navigation() {
        let mut c = controller();
        c.end_session();

        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.drain_effects().is_empty());
    }

    #[test]
    fn navigation_bounds() {
        let mut c = controller();
        c.start_session(TestType::Mcq);

        c.go_to_question(4);
        assert_eq!(c.state().current_question_index, 4);
        c.go_to_question(5);
        assert_eq!(c.state().current_question_index, 4);
        c.next_question();
        assert_eq!(c.state().current_question_index, 4);

        c.go_to_question(0);
        c.prev_question();
        assert_eq!(c.state().current_question_index, 0);
    }

    #[test]
    fn navigation_without_session_is_ignored() {
        let mut c = controller();
        c.go_to_question(1);
        assert_eq!(c.state().current_question_index, 0);
    }

    #[test]
    fn answer_records_and_clears_flag() {
        let mut c = controller();
        c.start_session(TestType::Mcq);

        c.toggle_review_flag(1);
        assert_eq!(c.state().status(1), QuestionStatus::FlaggedForReview);

        c.answer_multiple_choice(1, 2);
        assert_eq!(c.state().answer(1), Some(2));
        assert_eq!(c.state().status(1), QuestionStatus::Answered);

        c.answer_multiple_choice(1, 0);
        assert_eq!(c.state().answer(1), Some(0));
    }

    #[test]
    fn invalid_answers_are_ignored() {
        let mut c = controller();
        c.start_session(TestType::Mcq);

        c.answer_multiple_choice(1, 4);
        c.answer_multiple_choice(42, 0);

        assert_eq!(c.state().answer(1), None);
        assert_eq!(c.state().status(1), QuestionStatus::Unanswered);
        assert!(!c.state().mcq_progress.contains_key(&42));
    }

    #[test]
    fn unflagging_answered_question_keeps_answer() {
        let mut c = controller();
        c.start_session(TestType::Mcq);

        c.answer_multiple_choice(3, 1);
        c.toggle_review_flag(3);
        assert_eq!(c.state().status(3), QuestionStatus::FlaggedForReview);
        c.toggle_review_flag(3);

        assert_eq!(c.state().status(3), QuestionStatus::Answered);
        assert_eq!(c.state().answer(3), Some(1));
    }

    #[test]
    fn answers_locked_after_end() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.end_session();

        c.answer_multiple_choice(1, 1);
        c.toggle_review_flag(2);

        assert_eq!(c.state().answer(1), None);
        assert_eq!(c.state().status(2), QuestionStatus::Unanswered);
    }

    #[test]
    fn run_tests_fills_results_and_notifies() {
        let mut c = controller();
        c.start_session(TestType::Coding);
        c.drain_effects();

        c.run_tests();

        assert_eq!(c.state().test_results.len(), 3);
        assert!(c.state().test_results.values().all(|v| *v));
        let effects = c.drain_effects();
        let n = notices(&effects);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].message, "3 of 3 tests passed!");
    }

    #[test]
    fn run_tests_outside_coding_is_ignored() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.drain_effects();

        c.run_tests();

        assert!(c.state().test_results.is_empty());
        assert!(c.drain_effects().is_empty());
    }

    fn two_problem_controller(grader: Box<dyn Grader>) -> SessionController {
        let mut bank = QuestionBank::builtin().unwrap();
        bank.coding.push(crate::questions::CodingQuestion {
            id: 2,
            title: "Second".to_string(),
            description: "d".to_string(),
            test_cases: vec![
                crate::questions::TestCase {
                    input: "1".to_string(),
                    output: "1".to_string(),
                };
                4
            ],
            sample_solution: None,
            starter_code: Some("def second(): pass".to_string()),
        });
        SessionController::new(Arc::new(bank), grader, SessionConfig::default())
    }

    #[test]
    fn coding_navigation_loads_starter_code_and_keeps_drafts() {
        let mut c = two_problem_controller(Box::new(ConstGrader(true)));
        c.start_session(TestType::Coding);
        assert_eq!(c.question_count(), 2);
        c.update_code("first draft");
        c.run_tests();

        c.next_question();
        assert_eq!(c.state().current_question_index, 1);
        assert_eq!(c.state().code_text, "def second(): pass");
        assert!(c.state().test_results.is_empty());

        c.update_code("second draft");
        c.prev_question();
        assert_eq!(c.state().code_text, "first draft");
        c.next_question();
        assert_eq!(c.state().code_text, "second draft");
    }

    struct ShortGrader;

    impl Grader for ShortGrader {
        fn evaluate(&mut self, _question: &CodingQuestion, _code: &str) -> Vec<bool> {
            vec![true]
        }
    }

    #[test]
    fn missing_verdicts_count_as_failures() {
        let mut c = two_problem_controller(Box::new(ShortGrader));
        c.start_session(TestType::Coding);
        c.go_to_question(1);
        c.drain_effects();

        c.run_tests();

        let results: Vec<bool> = c.state().test_results.values().copied().collect();
        assert_eq!(results, vec![true, false, false, false]);
        assert_eq!(notices(&c.drain_effects())[0].message, "1 of 4 tests passed!");
    }

    #[test]
    fn run_tests_after_end_is_ignored() {
        let mut c = controller();
        c.start_session(TestType::Coding);
        c.end_session();
        c.drain_effects();

        c.run_tests();

        assert!(c.state().test_results.is_empty());
        assert!(c.drain_effects().is_empty());
    }

    #[test]
    fn submit_twice_finalizes_once() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.drain_effects();

        assert_eq!(c.submit_test(), Ok(()));
        assert_eq!(c.submit_test(), Err(SessionError::AlreadySubmitting));
        assert!(c.state().is_submitting);

        c.advance(Duration::from_millis(1499));
        assert!(c.is_active());

        c.advance(Duration::from_millis(1));
        assert!(!c.is_active());
        assert!(!c.state().is_submitting);

        let effects = c.drain_effects();
        assert_eq!(navigations(&effects), 1);
        assert!(notices(&effects)
            .iter()
            .any(|n| n.message == SUBMITTED_MESSAGE));
    }

    #[test]
    fn submit_requires_active_session() {
        let mut c = controller();
        assert_matches!(c.submit_test(), Err(SessionError::NotActive));
    }

    #[test]
    fn tick_counts_down_and_expires_once() {
        let bank = Arc::new(QuestionBank::builtin().unwrap());
        let config = SessionConfig {
            time_limit_secs: 3,
            ..SessionConfig::default()
        };
        let mut c = SessionController::new(bank, Box::new(ConstGrader(true)), config);
        c.start_session(TestType::Mcq);
        c.drain_effects();

        c.tick();
        c.tick();
        assert_eq!(c.state().time_remaining_secs, 1);
        assert!(c.is_active());

        for _ in 0..5 {
            c.tick();
        }

        assert_eq!(c.state().time_remaining_secs, 0);
        assert_eq!(c.phase(), Phase::Ended);
        let effects = c.drain_effects();
        assert_eq!(navigations(&effects), 1);
        assert_eq!(
            notices(&effects)
                .iter()
                .filter(|n| n.message == TIME_UP_MESSAGE)
                .count(),
            1
        );
    }

    #[test]
    fn tick_before_start_does_nothing() {
        let mut c = controller();
        c.tick();
        assert_eq!(c.state().time_remaining_secs, 3600);
    }

    #[test]
    fn advance_issues_whole_second_ticks() {
        let mut c = controller();
        c.start_session(TestType::Mcq);

        c.advance(Duration::from_millis(400));
        assert_eq!(c.state().time_remaining_secs, 3600);
        c.advance(Duration::from_millis(700));
        assert_eq!(c.state().time_remaining_secs, 3599);
        c.advance(Duration::from_millis(2900));
        assert_eq!(c.state().time_remaining_secs, 3596);
    }

    #[test]
    fn violations_warn_then_terminate_after_grace() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.drain_effects();

        c.report_violation();
        c.report_violation();
        assert!(c.is_active());
        let effects = c.drain_effects();
        let n = notices(&effects);
        assert_eq!(n.len(), 2);
        assert!(n[0].message.starts_with("Warning 1/3"));
        assert!(n[1].message.starts_with("Warning 2/3"));
        assert_eq!(n[0].level, NoticeLevel::Warning);

        c.report_violation();
        assert!(c.is_active());
        assert!(c.has_pending_termination());
        let effects = c.drain_effects();
        assert_eq!(
            notices(&effects)[0].message,
            "You have been warned 3 times. The test will now end."
        );

        c.advance(Duration::from_millis(1999));
        assert!(c.is_active());
        c.advance(Duration::from_millis(1));
        assert!(!c.is_active());
        assert_eq!(c.state().violation_count, 3);
    }

    #[test]
    fn violations_during_grace_are_ignored() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        for _ in 0..3 {
            c.report_violation();
        }
        c.drain_effects();

        c.report_violation();

        assert_eq!(c.state().violation_count, 3);
        assert!(c.drain_effects().is_empty());
    }

    #[test]
    fn violations_outside_session_are_ignored() {
        let mut c = controller();
        c.report_violation();
        assert_eq!(c.state().violation_count, 0);
    }

    #[test]
    fn full_screen_exit_warns_only_when_active() {
        let mut c = controller();
        c.on_full_screen_changed(false);
        assert!(c.drain_effects().is_empty());

        c.start_session(TestType::Mcq);
        c.drain_effects();
        c.on_full_screen_changed(false);

        assert!(!c.state().is_full_screen);
        let effects = c.drain_effects();
        assert_eq!(notices(&effects)[0].message, FULL_SCREEN_MESSAGE);

        c.on_full_screen_changed(true);
        assert!(c.state().is_full_screen);
        assert!(c.drain_effects().is_empty());
    }

    #[test]
    fn teardown_cancels_ticks_and_pending_actions() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        c.submit_test().unwrap();
        c.drain_effects();

        c.teardown();
        c.advance(Duration::from_secs(10));

        assert!(c.is_torn_down());
        assert_eq!(c.state().time_remaining_secs, 3600);
        assert!(c.is_active());
        assert!(c.drain_effects().is_empty());
    }

    #[test]
    fn ending_cancels_pending_termination() {
        let mut c = controller();
        c.start_session(TestType::Mcq);
        for _ in 0..3 {
            c.report_violation();
        }
        c.end_session();
        c.drain_effects();

        c.advance(Duration::from_secs(5));
        assert!(!c.has_pending_termination());
        assert!(c.drain_effects().is_empty());
    }
}
