use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InstructionTab};
use crate::util::time_limit_label;

use super::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub const GENERAL_RULES: [&str; 8] = [
    "This is a secure, distraction-free testing environment.",
    "The test opens in exam mode and requires a full-size terminal.",
    "You may not leave full-screen mode during the test.",
    "Switching windows or terminal focus is not allowed and will be monitored.",
    "You will receive 3 warnings for rule violations before automatic termination.",
    "The timer keeps running while the test is open.",
    "Make sure your terminal is at least the required size before beginning.",
    "Do not close the terminal during the test.",
];

pub const MCQ_RULES: [&str; 6] = [
    "The test consists of multiple-choice questions with single correct answers.",
    "Use the navigation panel to move between questions.",
    "You can mark questions for review and return to them later.",
    "All questions carry equal marks.",
    "There is no negative marking for wrong answers.",
    "You can change your answers at any time before submission.",
];

pub const CODING_RULES: [&str; 6] = [
    "Read the problem statement carefully before writing code.",
    "You can run your code against test cases before final submission.",
    "Your code should pass all test cases for maximum points.",
    "Focus on correctness first, then optimize for performance.",
    "The editor expects JavaScript.",
    "Use the test results tab to debug your solution.",
];

pub fn rules(tab: InstructionTab) -> &'static [&'static str] {
    match tab {
        InstructionTab::General => &GENERAL_RULES,
        InstructionTab::Mcq => &MCQ_RULES,
        InstructionTab::Coding => &CODING_RULES,
    }
}

fn section_heading(tab: InstructionTab) -> &'static str {
    match tab {
        InstructionTab::General => "Important Rules",
        InstructionTab::Mcq => "MCQ Test Information",
        InstructionTab::Coding => "Coding Assessment Information",
    }
}

pub fn render_landing(app: &App, f: &mut Frame) {
    let area = f.area().inner(Margin {
        horizontal: HORIZONTAL_MARGIN,
        vertical: VERTICAL_MARGIN,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "Exam Instructions",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let selected = InstructionTab::ALL
        .iter()
        .position(|t| *t == app.instruction_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(InstructionTab::ALL.iter().map(|t| t.title()))
        .select(selected)
        .block(Block::default().borders(Borders::BOTTOM))
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, chunks[1]);

    let tab = app.instruction_tab;
    let mut lines = vec![
        Line::from(Span::styled(
            section_heading(tab),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        rules(tab)
            .iter()
            .map(|rule| Line::from(format!("  • {}", rule))),
    );
    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(body, chunks[2]);

    let time_limit = Paragraph::new(Line::from(vec![
        Span::styled("Time Limit: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(time_limit_label(app.config.time_limit_secs)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(time_limit, chunks[3]);

    let legend = Paragraph::new(Span::styled(
        "(1) start MCQ test / (2) start coding test / (←/→) tabs / (q)uit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(legend, chunks[4]);
}
