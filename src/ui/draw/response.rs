//! Response view of the request panel

use super::styling::{dim_style, status_color};
use crate::types::ApiResponse;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Pretty-print JSON bodies, leave anything else as it is
pub fn try_format_json(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Response headers sorted by name
pub fn sorted_headers(response: &ApiResponse) -> Vec<(&str, &str)> {
    let mut headers: Vec<_> = response
        .headers
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    headers.sort_by_key(|(key, _)| *key);
    headers
}

/// Number of scrollable lines in the current view, for clamping the scroll position
pub fn response_line_count(response: &ApiResponse, show_headers: bool) -> usize {
    if show_headers {
        sorted_headers(response).len()
    } else if response.is_error {
        response
            .error_message
            .as_deref()
            .map_or(0, |message| message.lines().count())
    } else {
        try_format_json(&response.body).lines().count()
    }
}

pub fn render_response(
    frame: &mut Frame,
    area: Rect,
    response: Option<&ApiResponse>,
    executing: bool,
    scroll: usize,
    show_headers: bool,
) {
    let mut lines: Vec<Line> = Vec::new();

    if executing {
        lines.push(Line::from(Span::styled(
            "⏳ Executing request...",
            Style::default().fg(Color::Cyan),
        )));
    } else if let Some(response) = response {
        if response.is_error {
            lines.push(Line::from(Span::styled(
                "❌ Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            if let Some(message) = &response.error_message {
                lines.extend(message.lines().skip(scroll).map(|line| {
                    Line::from(Span::styled(
                        line.to_string(),
                        Style::default().fg(Color::Red),
                    ))
                }));
            }
        } else {
            lines.push(Line::from(vec![
                Span::styled("Status: ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{} {}", response.status, response.status_text),
                    Style::default().fg(status_color(response.status)),
                ),
                Span::raw("  "),
                Span::styled("Duration: ", Style::default().fg(Color::Cyan)),
                Span::raw(format!("{}ms", response.duration.as_millis())),
                Span::raw("  "),
                Span::styled(
                    response
                        .headers
                        .get("content-type")
                        .cloned()
                        .unwrap_or_default(),
                    dim_style(),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                if show_headers {
                    "Headers  (H: body)"
                } else {
                    "Body  (H: headers)"
                },
                dim_style(),
            )));

            if show_headers {
                lines.extend(header_lines(response, scroll));
            } else {
                // The first visible body line is what `y` copies
                let formatted_body = try_format_json(&response.body);
                for (idx, line) in formatted_body.lines().enumerate().skip(scroll) {
                    lines.push(Line::from(Span::styled(line.to_string(), top_line_style(idx, scroll))));
                }
            }
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Press [s] to send the request",
            dim_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn top_line_style(index: usize, scroll: usize) -> Style {
    if index == scroll {
        Style::default().add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
    }
}

/// `name: value` lines for the headers view, starting at `scroll`
pub fn header_lines(response: &ApiResponse, scroll: usize) -> Vec<Line<'static>> {
    let headers = sorted_headers(response);
    if headers.is_empty() {
        return vec![Line::from(Span::styled("No headers", dim_style()))];
    }
    headers
        .into_iter()
        .enumerate()
        .skip(scroll)
        .map(|(idx, (key, value))| {
            Line::from(vec![
                Span::styled(format!("{key}: "), Style::default().fg(Color::Cyan)),
                Span::styled(value.to_string(), top_line_style(idx, scroll)),
            ])
        })
        .collect()
}
