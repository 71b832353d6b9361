use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, CodingTab};
use crate::controller::SessionController;

use super::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub fn render_coding(app: &App, f: &mut Frame) {
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

    let title = session.current_coding().map_or_else(
        || "Coding Assessment".to_string(),
        |q| {
            format!(
                "{} (Problem {} of {})",
                q.title,
                session.state().current_question_index + 1,
                session.question_count()
            )
        },
    );
    let header = Paragraph::new(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    render_problem_pane(app, session, f, columns[0]);
    render_editor(session, f, columns[1]);

    let submit = if session.state().is_submitting {
        "Submitting..."
    } else {
        "(ctrl+s) submit solution"
    };
    let legend = Paragraph::new(Span::styled(
        format!(
            "(ctrl+r) run tests / (ctrl+t) switch tab / (ctrl+n/p) next/prev problem / {} / (esc) leave",
            submit
        ),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(legend, rows[2]);
}

fn render_problem_pane(app: &App, session: &SessionController, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let selected = match app.coding_tab {
        CodingTab::Problem => 0,
        CodingTab::Results => 1,
    };
    let tabs = Tabs::new(["Problem", "Test Results"])
        .select(selected)
        .block(Block::default().borders(Borders::BOTTOM))
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, chunks[0]);

    let lines = match app.coding_tab {
        CodingTab::Problem => problem_lines(session),
        CodingTab::Results => result_lines(session),
    };
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, chunks[1]);
}

fn problem_lines(session: &SessionController) -> Vec<Line<'static>> {
    let Some(question) = session.current_coding() else {
        return Vec::new();
    };
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = question
        .description
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Test Cases:", bold)));
    for case in &question.test_cases {
        lines.push(Line::from(vec![
            Span::styled("Input: ", bold),
            Span::raw(case.input.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Expected Output: ", bold),
            Span::raw(case.output.clone()),
        ]));
        lines.push(Line::from(""));
    }
    lines
}

fn result_lines(session: &SessionController) -> Vec<Line<'static>> {
    let results = &session.state().test_results;
    let Some(question) = session.current_coding() else {
        return Vec::new();
    };
    if results.is_empty() {
        return vec![
            Line::from("No test results yet"),
            Line::from(Span::styled(
                "Press ctrl+r to run tests",
                Style::default().fg(Color::DarkGray),
            )),
        ];
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Test Results:", bold)), Line::from("")];
    for (i, case) in question.test_cases.iter().enumerate() {
        let verdict = match results.get(&i) {
            Some(true) => Span::styled("Passed", Style::default().fg(Color::Green)),
            Some(false) => Span::styled("Failed", Style::default().fg(Color::Red)),
            None => Span::styled("Not run", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("Test {}: ", i + 1), bold),
            verdict,
        ]));
        lines.push(Line::from(format!("  Input: {}", case.input)));
        lines.push(Line::from(format!("  Expected: {}", case.output)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{} of {} tests passed",
        session.state().passed_tests(),
        question.test_cases.len()
    )));
    lines
}

fn render_editor(session: &SessionController, f: &mut Frame, area: Rect) {
    let code = &session.state().code_text;
    let gutter = Style::default().fg(Color::DarkGray);
    let mut lines: Vec<Line> = code
        .split('\n')
        .enumerate()
        .map(|(i, l)| {
            Line::from(vec![
                Span::styled(format!("{:>3} ", i + 1), gutter),
                Span::raw(l),
            ])
        })
        .collect();

    // cursor sits at the end of the buffer
    if let Some(last) = lines.last_mut() {
        last.spans.push(Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }

    // keep the end of the buffer in view
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let editor = Paragraph::new(lines)
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" Code Editor "));
    f.render_widget(editor, area);
}
