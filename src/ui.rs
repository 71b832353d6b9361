pub mod coding;
pub mod landing;
pub mod mcq;
pub mod screen;
pub mod submitted;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::controller::NoticeLevel;
use crate::util::{format_hms, timer_tier, TimerTier};

pub const HORIZONTAL_MARGIN: u16 = 2;
pub const VERTICAL_MARGIN: u16 = 1;

/// Draw the whole frame: the route's screen, then the badges and overlays
pub fn ui(app: &App, f: &mut Frame) {
    let area = f.area();
    screen::current_screen(&app.route).render(app, f);

    if let Some(session) = app.session.as_ref().filter(|s| s.is_active()) {
        render_timer(session.state().time_remaining_secs, area, f);
    }
    if app.is_blocked() {
        render_full_screen_warning(area, f);
    }
    render_notices(app, area, f);
}

pub fn timer_color(secs: u64) -> Color {
    match timer_tier(secs) {
        TimerTier::Critical => Color::Red,
        TimerTier::Caution => Color::Yellow,
        TimerTier::Normal => Color::Blue,
    }
}

fn render_timer(secs: u64, area: Rect, f: &mut Frame) {
    let text = format!(" ⏱ {} ", format_hms(secs));
    let width = (text.width() as u16 + 2).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y,
        width,
        height: 3.min(area.height),
    };

    let badge = Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(timer_color(secs))
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(Clear, rect);
    f.render_widget(badge, rect);
}

/// Rect of `width` x `height` centred inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_full_screen_warning(area: Rect, f: &mut Frame) {
    // dim everything underneath
    f.render_widget(
        Block::default().style(Style::default().bg(Color::Black).fg(Color::DarkGray)),
        area,
    );

    let rect = centered(area, 60, 9);
    let body = vec![
        Line::from(Span::styled(
            "This test must be taken in full-screen mode. Please enlarge the terminal to continue in full-screen.",
            Style::default(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "(x) Exit Test",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("      "),
            Span::styled(
                "(f) Enter Full Screen",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let warning = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(
                    " Full Screen Required ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(Clear, rect);
    f.render_widget(warning, rect);
}

pub fn notice_style(level: NoticeLevel) -> Style {
    let color = match level {
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_notices(app: &App, area: Rect, f: &mut Frame) {
    let lines: Vec<Line> = app
        .notices
        .visible()
        .map(|n| Line::from(Span::styled(n.message.clone(), notice_style(n.level))))
        .collect();
    if lines.is_empty() {
        return;
    }

    let height = (lines.len() as u16 + 2).min(area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(height)])
        .split(area);
    let rect = chunks[1].inner(ratatui::layout::Margin {
        horizontal: HORIZONTAL_MARGIN,
        vertical: 0,
    });

    let banner = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Notices "));
    f.render_widget(Clear, rect);
    f.render_widget(banner, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::grader::GraderKind;
    use crate::host::RecordingHost;
    use crate::questions::QuestionBank;
    use crate::host::HostSignal;
    use ratatui::{backend::TestBackend, Terminal};

    pub(crate) fn test_app() -> App {
        let config = Config {
            grader: GraderKind::AcceptAll,
            ..Config::default()
        };
        App::new(config, QuestionBank::builtin().unwrap())
    }

    pub(crate) fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn timer_colors_follow_tiers() {
        assert_eq!(timer_color(3600), Color::Blue);
        assert_eq!(timer_color(900), Color::Yellow);
        assert_eq!(timer_color(30), Color::Red);
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered(area, 60, 9);
        assert_eq!(r.width, 40);
        assert_eq!(r.height, 9);
        assert_eq!(r.x, 0);

        let r = centered(area, 20, 4);
        assert_eq!((r.x, r.y), (10, 3));
    }

    #[test]
    fn active_session_shows_timer() {
        let mut app = test_app();
        let mut host = RecordingHost::default();
        app.open_route("/test?type=mcq", &mut host);

        let content = render(&app, 120, 40);
        assert!(content.contains("01:00:00"));
    }

    #[test]
    fn blocked_session_shows_overlay() {
        let mut app = test_app();
        let mut host = RecordingHost::default();
        app.open_route("/test?type=mcq", &mut host);
        app.handle_signal(HostSignal::FullScreenChanged(false), &mut host);

        let content = render(&app, 120, 40);
        assert!(content.contains("Full Screen Required"));
        assert!(content.contains("Please remain in full-screen mode"));
    }

    #[test]
    fn renders_in_tiny_terminal_without_panicking() {
        let mut app = test_app();
        let mut host = RecordingHost::default();
        app.open_route("/test?type=coding", &mut host);
        app.handle_signal(HostSignal::FullScreenChanged(false), &mut host);

        render(&app, 10, 4);
    }
}
