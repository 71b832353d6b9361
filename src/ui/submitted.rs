use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::controller::SessionController;
use crate::session::TestType;

use super::centered;

/// One-line recap of what was handed in
pub fn summary(session: &SessionController) -> Option<String> {
    let state = session.state();
    match state.test_type? {
        TestType::Mcq => {
            let counts = state.status_counts();
            Some(format!(
                "Answered {} of {} questions ({} marked for review)",
                counts.answered,
                session.question_count(),
                counts.marked
            ))
        }
        TestType::Coding if state.test_results.is_empty() => {
            Some("Solution submitted without running tests".to_string())
        }
        TestType::Coding => Some(format!(
            "Last test run: {} of {} tests passed",
            state.passed_tests(),
            state.test_results.len()
        )),
    }
}

pub fn render_submitted(app: &App, f: &mut Frame) {
    let area = centered(f.area(), 64, 12);

    let mut lines = vec![
        Line::from(Span::styled(
            "✓",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Your test has been successfully submitted for evaluation."),
    ];
    if let Some(text) = app.session.as_ref().and_then(summary) {
        lines.push(Line::from(Span::styled(text, Style::default().fg(Color::Blue))));
    }
    lines.extend([
        Line::from(Span::styled(
            "You will receive your results after the evaluation is complete.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) Return to Dashboard / (q)uit",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ]);

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green))
                .title(Span::styled(
                    " Test Submitted ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ))
                .title_alignment(Alignment::Center),
        );
    f.render_widget(card, area);
}
