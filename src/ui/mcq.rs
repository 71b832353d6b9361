use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::controller::SessionController;
use crate::session::QuestionStatus;

use super::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const NAV_COLUMNS: usize = 3;
const NAV_WIDTH: u16 = 26;

pub fn status_style(status: QuestionStatus, current: bool) -> Style {
    let style = match status {
        QuestionStatus::Answered => Style::default().fg(Color::Black).bg(Color::Green),
        QuestionStatus::FlaggedForReview => Style::default().fg(Color::Black).bg(Color::Yellow),
        QuestionStatus::Unanswered => Style::default(),
    };
    if current {
        style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        style
    }
}

pub fn render_mcq(app: &App, f: &mut Frame) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let area = f.area().inner(Margin {
        horizontal: HORIZONTAL_MARGIN,
        vertical: VERTICAL_MARGIN,
    });

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(1)])
        .split(area);

    let header = Paragraph::new(Span::styled(
        "Multiple Choice Test",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(NAV_WIDTH), Constraint::Min(20)])
        .split(rows[1]);

    render_navigator(session, f, columns[0]);
    render_question(session, f, columns[1]);

    let legend = Paragraph::new(Span::styled(
        "(1-9) answer / (p)rev / (n)ext / (r) mark for review / (s)ubmit / (esc) leave",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(legend, rows[2]);
}

fn render_navigator(session: &SessionController, f: &mut Frame, area: Rect) {
    let state = session.state();
    let mut lines: Vec<Line> = session
        .bank()
        .mcq
        .iter()
        .enumerate()
        .chunks(NAV_COLUMNS)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .flat_map(|(index, q)| {
                    let current = index == state.current_question_index;
                    [
                        Span::styled(
                            format!(" {:>2} ", index + 1),
                            status_style(state.status(q.id), current),
                        ),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let counts = state.status_counts();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("Legend:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("    ", status_style(QuestionStatus::Unanswered, false)),
            Span::raw(" Unanswered"),
        ]),
        Line::from(vec![
            Span::styled("    ", status_style(QuestionStatus::Answered, false)),
            Span::raw(" Answered"),
        ]),
        Line::from(vec![
            Span::styled("    ", status_style(QuestionStatus::FlaggedForReview, false)),
            Span::raw(" Marked"),
        ]),
        Line::from(""),
        Line::from(Span::styled("Statistics", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!("Answered: {}", counts.answered)),
        Line::from(format!("Unanswered: {}", counts.unanswered)),
        Line::from(format!("Marked: {}", counts.marked)),
    ]);

    let navigator =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Questions "));
    f.render_widget(navigator, area);
}

fn render_question(session: &SessionController, f: &mut Frame, area: Rect) {
    let Some(question) = session.current_mcq() else {
        return;
    };
    let state = session.state();
    let index = state.current_question_index;
    let total = session.question_count();
    let chosen = state.answer(question.id);
    let flagged = state.status(question.id) == QuestionStatus::FlaggedForReview;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Question {} of {}", index + 1, total),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            if flagged {
                Span::styled("[Marked]", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("[Mark for Review]", Style::default().fg(Color::DarkGray))
            },
        ]),
        Line::from(""),
        Line::from(question.text.as_str()),
        Line::from(""),
    ];

    lines.extend(question.options.iter().enumerate().map(|(i, option)| {
        let selected = chosen == Some(i);
        let marker = if selected { "(•)" } else { "( )" };
        let style = if selected {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(Span::styled(format!("{} {}. {}", marker, i + 1, option), style))
    }));

    let disabled = Style::default().fg(Color::DarkGray);
    let enabled = Style::default();
    lines.extend([
        Line::from(""),
        Line::from(vec![
            Span::styled("← Previous", if index == 0 { disabled } else { enabled }),
            Span::raw("    "),
            Span::styled(
                "Next →",
                if index + 1 >= total { disabled } else { enabled },
            ),
            Span::raw("    "),
            Span::styled(
                "Submit Test",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
    ]);

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(card, area);
}
