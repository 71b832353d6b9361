use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::controller::{Effect, Notice, NoticeLevel, SessionController};
use crate::host::{Host, HostSignal};
use crate::questions::QuestionBank;
use crate::route::Route;
use crate::runtime::ExamEvent;
use crate::session::TestType;

pub const TICK_RATE_MS: u64 = 100;
/// Window in which a second leave request is taken as confirmation
pub const UNLOAD_CONFIRM_MS: u64 = 5000;
pub const LEAVE_WARNING: &str =
    "Are you sure you want to leave the test? Your progress will be lost. Press again to leave.";
pub const INVALID_TEST_TYPE: &str = "Invalid test type. Redirecting to home page.";

const MAX_VISIBLE_NOTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstructionTab {
    #[default]
    General,
    Mcq,
    Coding,
}

impl InstructionTab {
    pub const ALL: [InstructionTab; 3] = [
        InstructionTab::General,
        InstructionTab::Mcq,
        InstructionTab::Coding,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            InstructionTab::General => "General Guidelines",
            InstructionTab::Mcq => "MCQ Test Format",
            InstructionTab::Coding => "Coding Assessment",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodingTab {
    #[default]
    Problem,
    Results,
}

impl CodingTab {
    pub fn toggle(&self) -> Self {
        match self {
            CodingTab::Problem => CodingTab::Results,
            CodingTab::Results => CodingTab::Problem,
        }
    }
}

#[derive(Debug, Clone)]
struct LiveNotice {
    notice: Notice,
    expires_at_ms: u64,
}

/// Notices on screen, dropped once their display time runs out
#[derive(Debug, Default)]
pub struct NoticeBoard {
    items: VecDeque<LiveNotice>,
    now_ms: u64,
}

impl NoticeBoard {
    pub fn push(&mut self, notice: Notice) {
        let expires_at_ms = self.now_ms + notice.duration.as_millis() as u64;
        self.items.push_back(LiveNotice {
            notice,
            expires_at_ms,
        });
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.now_ms += elapsed.as_millis() as u64;
        let now = self.now_ms;
        self.items.retain(|n| n.expires_at_ms > now);
    }

    /// Newest last
    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        let skip = self.items.len().saturating_sub(MAX_VISIBLE_NOTICES);
        self.items.iter().skip(skip).map(|n| &n.notice)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct App {
    pub config: Config,
    bank: Arc<QuestionBank>,
    pub route: Route,
    pub session: Option<SessionController>,
    pub instruction_tab: InstructionTab,
    pub coding_tab: CodingTab,
    pub notices: NoticeBoard,
    clock_ms: u64,
    unload_armed_until: Option<u64>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, bank: QuestionBank) -> Self {
        Self {
            config,
            bank: Arc::new(bank),
            route: Route::Landing,
            session: None,
            instruction_tab: InstructionTab::default(),
            coding_tab: CodingTab::default(),
            notices: NoticeBoard::default(),
            clock_ms: 0,
            unload_armed_until: None,
            should_quit: false,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Navigate to a route given as a path, e.g. `/test?type=mcq`.
    /// Unparseable routes land on the instructions view with an error notice.
    pub fn open_route(&mut self, path: &str, host: &mut dyn Host) {
        match Route::parse(path) {
            Ok(Route::Test(test_type)) => self.open_test(test_type, host),
            Ok(Route::Landing) => self.go_landing(),
            Ok(Route::Submitted) => self.route = Route::Submitted,
            Err(e) => {
                warn!(path, error = %e, "rejected route");
                self.notices
                    .push(Notice::new(NoticeLevel::Error, INVALID_TEST_TYPE, 4000));
                self.go_landing();
            }
        }
    }

    /// Every test opens with a fresh controller; an ended one cannot restart
    fn open_test(&mut self, test_type: TestType, host: &mut dyn Host) {
        self.close_session();

        let mut controller = SessionController::new(
            Arc::clone(&self.bank),
            self.config.grader.build(self.config.grader_seed),
            self.config.session_config(),
        );
        controller.start_session(test_type);
        self.session = Some(controller);
        self.route = Route::Test(test_type);
        self.coding_tab = CodingTab::default();
        self.unload_armed_until = None;
        info!(route = %self.route.path(), "test opened");

        self.apply_effects(host);
    }

    fn go_landing(&mut self) {
        self.close_session();
        self.route = Route::Landing;
    }

    pub fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
    }

    pub fn advance(&mut self, elapsed: Duration, host: &mut dyn Host) {
        self.clock_ms += elapsed.as_millis() as u64;
        self.notices.advance(elapsed);
        if let Some(session) = self.session.as_mut() {
            session.advance(elapsed);
        }
        self.apply_effects(host);
    }

    pub fn handle_event(&mut self, event: ExamEvent, host: &mut dyn Host) {
        match event {
            ExamEvent::Key(key) => self.handle_key(key, host),
            ExamEvent::Resize(cols, rows) => {
                if let Some(full_screen) = host.on_resize(cols, rows) {
                    self.handle_signal(HostSignal::FullScreenChanged(full_screen), host);
                }
            }
            ExamEvent::FocusLost => self.handle_signal(HostSignal::FocusLost, host),
            ExamEvent::FocusGained | ExamEvent::Tick => {}
        }
    }

    pub fn handle_signal(&mut self, signal: HostSignal, host: &mut dyn Host) {
        debug!(?signal, "host signal");
        match signal {
            HostSignal::FullScreenChanged(full_screen) => {
                if let Some(session) = self.session.as_mut() {
                    session.on_full_screen_changed(full_screen);
                }
            }
            HostSignal::VisibilityChanged { hidden: true } | HostSignal::FocusLost => {
                if let Some(session) = self.session.as_mut() {
                    session.report_violation();
                }
            }
            HostSignal::VisibilityChanged { hidden: false } => {}
            HostSignal::UnloadRequested => self.request_quit(),
        }
        self.apply_effects(host);
    }

    fn request_quit(&mut self) {
        let in_progress = self
            .session
            .as_ref()
            .is_some_and(SessionController::warn_before_unload);
        if !in_progress {
            self.should_quit = true;
            return;
        }

        match self.unload_armed_until {
            Some(until) if self.clock_ms < until => {
                warn!("leaving during an active session");
                self.should_quit = true;
            }
            _ => {
                self.unload_armed_until = Some(self.clock_ms + UNLOAD_CONFIRM_MS);
                self.notices
                    .push(Notice::new(NoticeLevel::Warning, LEAVE_WARNING, UNLOAD_CONFIRM_MS));
            }
        }
    }

    /// Active session whose full-screen requirement is not met
    pub fn is_blocked(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.is_active() && !s.state().is_full_screen)
    }

    pub fn handle_key(&mut self, key: KeyEvent, host: &mut dyn Host) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            self.handle_signal(HostSignal::UnloadRequested, host);
            return;
        }

        let route = self.route;
        match route {
            Route::Landing => self.landing_key(key, host),
            Route::Submitted => match key.code {
                KeyCode::Enter => self.open_route(&Route::Landing.path(), host),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            Route::Test(_) if self.is_blocked() => self.overlay_key(key, host),
            Route::Test(TestType::Mcq) => self.mcq_key(key),
            Route::Test(TestType::Coding) => self.coding_key(key, ctrl),
        }
        self.apply_effects(host);
    }

    fn landing_key(&mut self, key: KeyEvent, host: &mut dyn Host) {
        match key.code {
            KeyCode::Right | KeyCode::Tab => self.instruction_tab = self.instruction_tab.next(),
            KeyCode::Left | KeyCode::BackTab => self.instruction_tab = self.instruction_tab.prev(),
            KeyCode::Char('1') | KeyCode::Char('m') => {
                self.open_route(&Route::Test(TestType::Mcq).path(), host)
            }
            KeyCode::Char('2') | KeyCode::Char('c') => {
                self.open_route(&Route::Test(TestType::Coding).path(), host)
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn overlay_key(&mut self, key: KeyEvent, host: &mut dyn Host) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char('f') | KeyCode::Enter => match host.request_full_screen() {
                Ok(()) => session.on_full_screen_changed(host.is_full_screen()),
                Err(e) => warn!(error = %e, "full-screen request failed"),
            },
            KeyCode::Char('x') => session.end_session(),
            _ => {}
        }
    }

    fn mcq_key(&mut self, key: KeyEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Left | KeyCode::Char('p') => session.prev_question(),
            KeyCode::Right | KeyCode::Char('n') => session.next_question(),
            KeyCode::Char('r') => {
                if let Some(id) = session.current_mcq().map(|q| q.id) {
                    session.toggle_review_flag(id);
                }
            }
            KeyCode::Char('s') => {
                if let Err(e) = session.submit_test() {
                    debug!(error = %e, "submit ignored");
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(id) = session.current_mcq().map(|q| q.id) {
                    let option = c as usize - '1' as usize;
                    session.answer_multiple_choice(id, option);
                }
            }
            _ => {}
        }
    }

    fn coding_key(&mut self, key: KeyEvent, ctrl: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_active() {
            return;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('r') => {
                    session.run_tests();
                    self.coding_tab = CodingTab::Results;
                }
                KeyCode::Char('s') => {
                    if let Err(e) = session.submit_test() {
                        debug!(error = %e, "submit ignored");
                    }
                }
                KeyCode::Char('t') => self.coding_tab = self.coding_tab.toggle(),
                KeyCode::Char('n') => {
                    session.next_question();
                    self.coding_tab = CodingTab::Problem;
                }
                KeyCode::Char('p') => {
                    session.prev_question();
                    self.coding_tab = CodingTab::Problem;
                }
                _ => {}
            }
            return;
        }

        let mut code = session.state().code_text.clone();
        match key.code {
            KeyCode::Char(c) => code.push(c),
            KeyCode::Enter => code.push('\n'),
            KeyCode::Tab => code.push_str("    "),
            KeyCode::Backspace => {
                code.pop();
            }
            _ => return,
        }
        session.update_code(code);
    }

    /// Carry out what the controller asked for, until it stops asking
    pub fn apply_effects(&mut self, host: &mut dyn Host) {
        loop {
            let Some(session) = self.session.as_mut() else {
                return;
            };
            let effects = session.drain_effects();
            if effects.is_empty() {
                return;
            }

            for effect in effects {
                match effect {
                    Effect::Notify(notice) => self.notices.push(notice),
                    Effect::Navigate(route) => {
                        info!(route = %route.path(), "navigate");
                        self.route = route;
                    }
                    Effect::RequestFullScreen => {
                        if let Err(e) = host.request_full_screen() {
                            warn!(error = %e, "full-screen request failed");
                            if let Some(session) = self.session.as_mut() {
                                session.on_full_screen_changed(false);
                            }
                        }
                    }
                    Effect::ExitFullScreen => host.exit_full_screen(),
                }
            }
        }
    }
}
