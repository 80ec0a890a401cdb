//! Modal dialog rendering
//!
//! - Spec source modal (spec location + base URL)
//! - Token input modal
//! - Help overlay

use super::components::editor_lines;
use super::styling::{MODAL_BG, MODAL_HELP_FG};
use crate::editor::LineEditor;
use crate::state::{AppState, Overlay, SourceForm};
use crate::types::SourceInputField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_overlay(frame: &mut Frame, state: &AppState) {
    match &state.overlay {
        Overlay::None => {}
        Overlay::Help => render_help_modal(frame),
        Overlay::Token(editor) => render_token_input_modal(frame, editor),
        Overlay::Source(form) => render_source_input_modal(frame, form),
    }
}

/// Centered rectangle of `width_ratio` of the screen (capped at `max_width`) and `height` lines
fn centered(area: Rect, width_ratio: f32, max_width: f32, height: u16) -> Rect {
    let width = (area.width as f32 * width_ratio).min(max_width) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn modal_block(title: &'static str, color: Color) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(MODAL_BG).fg(Color::White))
}

fn single_line(editor: &LineEditor, style: Style) -> Line<'static> {
    Line::from(
        editor_lines(editor, style)
            .into_iter()
            .flat_map(|line| line.spans)
            .collect::<Vec<Span>>(),
    )
}

/// Render the token input modal for bearer authentication
fn render_token_input_modal(frame: &mut Frame, editor: &LineEditor) {
    let modal_area = centered(frame.area(), 0.6, 80.0, 7);
    frame.render_widget(Clear, modal_area);

    let block = modal_block(" Enter Bearer Token ", Color::Cyan);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let label = Paragraph::new("Token:").style(Style::default().fg(Color::LightCyan));
    frame.render_widget(label, chunks[0]);

    // Full token while editing; the header only ever shows the masked form
    let input = single_line(
        editor,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(input), chunks[1]);

    let help = Paragraph::new("Enter: Save  |  Ctrl+L: Clear  |  Esc: Cancel")
        .style(Style::default().fg(MODAL_HELP_FG))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

/// Render the spec source modal (spec location + base URL)
fn render_source_input_modal(frame: &mut Frame, form: &SourceForm) {
    let modal_area = centered(frame.area(), 0.7, 90.0, 13);
    frame.render_widget(Clear, modal_area);

    let block = modal_block(" Configure Spec Source ", Color::Yellow);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Description
            Constraint::Length(1), // Source label
            Constraint::Length(1), // Source input
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Base URL label
            Constraint::Length(1), // Base URL input
            Constraint::Length(1), // Error
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let desc = Paragraph::new(
        "Spec source: local path or http(s) URL of the OpenAPI/Swagger document\nBase URL: where requests are sent (derived from a remote source if empty)",
    )
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: true });
    frame.render_widget(desc, chunks[0]);

    let fields = [
        (SourceInputField::SpecSource, "Spec source:", &form.spec_source, 1),
        (SourceInputField::BaseUrl, "API Base URL:", &form.base_url, 4),
    ];
    for (field, label, editor, row) in fields {
        let active = form.active == field;
        let marker = if active { "► " } else { "  " };
        let label = Paragraph::new(format!("{marker}{label}")).style(Style::default().fg(
            if active {
                Color::Yellow
            } else {
                Color::LightCyan
            },
        ));
        frame.render_widget(label, chunks[row]);

        let input = if active {
            single_line(
                editor,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Line::styled(editor.text(), Style::default().fg(Color::Gray))
        };
        frame.render_widget(Paragraph::new(input), chunks[row + 1]);
    }

    if let Some(error) = &form.error {
        let error = Paragraph::new(error.clone()).style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[6]);
    }

    let help = Paragraph::new(
        "Tab: Switch fields  |  Ctrl+L: Clear field  |  Enter: Load  |  Esc: Cancel",
    )
    .style(Style::default().fg(MODAL_HELP_FG))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[7]);
}

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Tab / Shift+Tab", "Cycle focus"),
            ("1 / 2 / 3", "Focus endpoints / detail / request"),
            ("f", "Fullscreen focused panel"),
            ("a / A", "Set / clear bearer token"),
            (",", "Change spec source"),
            ("y", "Copy path or response value"),
            ("Ctrl+R", "Reload spec"),
            ("q", "Quit"),
        ],
    ),
    (
        "Lists",
        &[
            ("j / k", "Move"),
            ("g / G", "First / last"),
            ("h / l", "Collapse / expand"),
            ("Enter", "Select, toggle or drill into a type"),
            ("Backspace", "Back out of a type"),
            ("/", "Filter endpoints"),
        ],
    ),
    (
        "Request",
        &[
            ("Enter / e", "Edit value"),
            ("s", "Send request"),
            ("Ctrl+D / Ctrl+U", "Scroll response"),
            ("H", "Toggle response headers / body"),
            ("Esc (body)", "Normal mode: h l w b 0 $ x i a I A"),
        ],
    ),
];

fn render_help_modal(frame: &mut Frame) {
    let line_count: usize = HELP_SECTIONS
        .iter()
        .map(|(_, keys)| keys.len() + 2)
        .sum();
    let modal_area = centered(frame.area(), 0.6, 70.0, line_count as u16 + 2);
    frame.render_widget(Clear, modal_area);

    let block = modal_block(" Help ", Color::Green);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let mut lines = Vec::with_capacity(line_count);
    for (title, keys) in HELP_SECTIONS {
        lines.push(Line::styled(
            title.to_string(),
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ));
        for (key, action) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<18}"), Style::default().fg(Color::Yellow)),
                Span::raw(action.to_string()),
            ]));
        }
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
