//! Reusable UI components
//!
//! - Header (source, load status, auth)
//! - Footer (status message or key help)
//! - Scrolling row list with overflow indicators
//! - Editor line with a visible cursor
//! - Loading/error/empty messages

use super::styling::{dim_style, selected_style};
use crate::editor::{EditorKind, EditorMode, LineEditor};
use crate::state::{AppState, Overlay};
use crate::types::{AuthState, LoadingState, PanelFocus};
use crate::viewport::{Viewport, ViewportState};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Render the application header with status and auth info
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let status_text = match &state.loading_state {
        LoadingState::Idle => "Idle".to_string(),
        LoadingState::Fetching => "Fetching...".to_string(),
        LoadingState::Parsing => "Parsing...".to_string(),
        LoadingState::Complete => format!("{} endpoints loaded", state.spec.endpoints.len()),
        LoadingState::Error(_) => "Error".to_string(),
    };

    let title = match (&state.spec.title, &state.spec.version) {
        (Some(title), Some(version)) => format!("{title} {version}"),
        (Some(title), None) => title.clone(),
        _ => state
            .spec_source
            .clone()
            .unwrap_or_else(|| "no spec source".to_string()),
    };

    let header_text = format!(
        "swagger-nav-tui - {title} [{status_text}] | {}",
        get_auth_status_text(&state.auth)
    );

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Render the footer: the last status message, otherwise help for the current context
pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = match &state.status_message {
        Some(message) => (message.clone(), Style::default().fg(Color::Magenta)),
        None => (footer_help(state).to_string(), Style::default().fg(Color::Yellow)),
    };

    let footer = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Commands"));

    frame.render_widget(footer, area);
}

fn footer_help(state: &AppState) -> &'static str {
    match &state.overlay {
        Overlay::Token(_) => return "Enter:Save Esc:Cancel Ctrl+L:Clear",
        Overlay::Source(_) => return "Tab:Switch field Enter:Load Esc:Cancel",
        Overlay::Help => return "Esc/?:Close help",
        Overlay::None => {}
    }
    if state.endpoints.is_capturing() {
        return "Type to filter  Enter:Keep filter  Esc:Clear filter";
    }
    if let Some((_, editor)) = state.request.editor() {
        return match (editor.kind(), editor.mode()) {
            (EditorKind::SingleLine, _) => "Enter:Save Esc:Cancel",
            (_, EditorMode::Insert) => "Esc:Normal mode  Enter:Newline",
            (_, EditorMode::Normal) => "h/l/w/b/0/$:Move x:Delete i/a/I/A:Insert Enter/Esc:Save",
        };
    }
    match state.focus {
        PanelFocus::Endpoints => {
            "Tab:Panel j/k:Nav Enter:Open/Toggle h/l:Fold /:Filter y:Copy path ,:Source a:Auth ?:Help q:Quit"
        }
        PanelFocus::Detail => {
            "Tab:Panel j/k:Nav Enter:Drill/Toggle Bksp:Back h/l:Fold f:Fullscreen ?:Help q:Quit"
        }
        PanelFocus::Request => {
            "Tab:Panel j/k:Nav Enter:Edit s:Send Ctrl+d/u:Scroll H:Headers y:Copy value ?:Help q:Quit"
        }
    }
}

/// Draws `lines` (one per row) inside `area`, scrolled so `cursor` stays
/// visible. `reserved` lines at the top of `area` are left to the caller.
pub fn render_row_list(
    frame: &mut Frame,
    area: Rect,
    lines: Vec<Line<'static>>,
    cursor: usize,
    viewport: &mut ViewportState,
    reserved: usize,
    focused: bool,
) {
    let window = viewport.update(lines.len(), cursor, area.height as usize, reserved);
    let list_area = Rect {
        y: area.y + reserved as u16,
        height: area.height.saturating_sub(reserved as u16),
        ..area
    };
    let visible = window_lines(lines, cursor, &window, list_area.height as usize, focused);
    frame.render_widget(Paragraph::new(visible), list_area);
}

/// The rows of `window` plus its overflow indicators. Indicators are left out
/// when they would not fit next to the rows in `height` lines.
fn window_lines(
    lines: Vec<Line<'static>>,
    cursor: usize,
    window: &Viewport,
    height: usize,
    focused: bool,
) -> Vec<Line<'static>> {
    let row_count = lines.len();
    let show_indicators = window.visible_count + window.indicator_lines() <= height;

    let mut visible: Vec<Line> = Vec::with_capacity(height);
    if show_indicators && window.overflow_above {
        visible.push(Line::styled(
            format!("▲ {} more", window.scroll_offset),
            dim_style(),
        ));
    }
    for (index, line) in lines
        .into_iter()
        .enumerate()
        .skip(window.scroll_offset)
        .take(window.visible_count)
    {
        if index == cursor {
            visible.push(line.patch_style(selected_style(focused)));
        } else {
            visible.push(line);
        }
    }
    if show_indicators && window.overflow_below {
        visible.push(Line::styled(
            format!("▼ {} more", window.hidden_below(row_count)),
            dim_style(),
        ));
    }
    visible
}

/// Editor contents with the cursor drawn as a reversed cell.
/// Returns one line per buffer line.
pub fn editor_lines(editor: &LineEditor, style: Style) -> Vec<Line<'static>> {
    let (cursor_line, cursor_col) = editor.cursor_line_col();
    let cursor_style = match editor.mode() {
        EditorMode::Insert => style.add_modifier(Modifier::REVERSED),
        EditorMode::Normal => style.bg(Color::Yellow).fg(Color::Black),
    };

    editor
        .lines()
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            if index != cursor_line {
                return Line::from(Span::styled(text, style));
            }
            let chars: Vec<char> = text.chars().collect();
            let before: String = chars[..cursor_col.min(chars.len())].iter().collect();
            let at: String = chars
                .get(cursor_col)
                .map(char::to_string)
                .unwrap_or_else(|| " ".to_string());
            let after: String = chars.iter().skip(cursor_col + 1).collect();
            Line::from(vec![
                Span::styled(before, style),
                Span::styled(at, cursor_style),
                Span::styled(after, style),
            ])
        })
        .collect()
}

/// Render loading spinner animation
pub fn render_loading_spinner(
    frame: &mut Frame,
    area: Rect,
    loading_state: &LoadingState,
    spinner_index: usize,
) {
    let progress_text = match loading_state {
        LoadingState::Fetching => "Fetching spec",
        LoadingState::Parsing => "Parsing endpoints",
        _ => "",
    };

    let loading_text = format!(
        "{} {}\n\nPlease wait...",
        SPINNER[spinner_index % SPINNER.len()],
        progress_text
    );

    frame.render_widget(
        Paragraph::new(loading_text).style(Style::default().fg(Color::Yellow)),
        area,
    );
}

/// Render error message with retry instructions
pub fn render_error_message(frame: &mut Frame, area: Rect, error: &str, retry_count: u32) {
    let retry_text = if retry_count > 0 {
        format!("\n\nRetry attempt: {retry_count}")
    } else {
        String::new()
    };

    let error_msg =
        format!("❌ {error}{retry_text}\n\nPress [Ctrl+R] to retry\nPress [,] to change source");

    frame.render_widget(
        Paragraph::new(error_msg)
            .style(Style::default().fg(Color::Red))
            .wrap(ratatui::widgets::Wrap { trim: false }),
        area,
    );
}

pub fn render_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    frame.render_widget(Paragraph::new(message.to_string()).style(dim_style()), area);
}

/// Get authentication status display text
fn get_auth_status_text(auth: &AuthState) -> String {
    if auth.is_authenticated() {
        let display = auth.get_masked_display();
        format!("🔒 {display} | 'a':edit 'A':clear")
    } else {
        "🔓 Not authenticated | 'a':set token".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<Line<'static>> {
        (0..count).map(|i| Line::raw(format!("row {i}"))).collect()
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_single_line_keeps_cursor_row() {
        let mut viewport = ViewportState::new();
        let window = viewport.update(10, 5, 1, 0);
        let visible = window_lines(numbered(10), 5, &window, 1, true);
        assert_eq!(visible.len(), 1);
        assert_eq!(text(&visible[0]), "row 5");
    }

    #[test]
    fn test_indicators_shown_when_room() {
        let mut viewport = ViewportState::new();
        let window = viewport.update(10, 5, 5, 0);
        let visible = window_lines(numbered(10), 5, &window, 5, true);
        assert_eq!(visible.len(), 5);
        assert!(text(&visible[0]).starts_with('▲'));
        assert!(text(&visible[4]).starts_with('▼'));
        assert!(visible.iter().any(|line| text(line) == "row 5"));
    }
}
