//! Main panel rendering
//!
//! - Endpoints panel: tag groups and the filter line
//! - Detail panel: sections of the selected endpoint, or a drilled-into schema
//! - Request panel: editable values and the last response

use super::components::{
    editor_lines, render_empty_message, render_error_message, render_loading_spinner,
    render_row_list,
};
use super::response::{render_response, response_line_count};
use super::styling::{
    border_style, dim_style, get_method_color, header_style, INDENT_WIDTH, METHOD_COLUMN_WIDTH,
};
use crate::editor::EditorMode;
use crate::navigator::NavigatorView;
use crate::panels::{DetailItem, EndpointListPanel, RequestField};
use crate::rows::{MarkerKind, Row};
use crate::schema_rows::SchemaField;
use crate::state::AppState;
use crate::types::{LoadingState, PanelFocus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn indent(depth: usize) -> String {
    " ".repeat(depth * INDENT_WIDTH)
}

fn fold_icon(collapsed: bool) -> &'static str {
    if collapsed {
        "▶"
    } else {
        "▼"
    }
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(focused))
}

/// Page size for PageUp/PageDown: the list height minus the indicator lines
fn page_size(area: Rect) -> usize {
    (area.height as usize).saturating_sub(2).max(1)
}

// ============================================================================
// Endpoints
// ============================================================================

pub fn render_endpoints_panel(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    spinner_index: usize,
) {
    let focused = state.focus == PanelFocus::Endpoints;
    let filter = state.endpoints.active_filter();
    let title = if filter.is_empty() {
        format!("[1] Endpoints ({})", state.endpoints.endpoint_count())
    } else {
        format!("[1] Endpoints - filter: {filter}")
    };
    let block = panel_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &state.loading_state {
        LoadingState::Fetching | LoadingState::Parsing => {
            render_loading_spinner(frame, inner, &state.loading_state, spinner_index);
            return;
        }
        LoadingState::Error(error) => {
            render_error_message(frame, inner, error, state.retry_count);
            return;
        }
        LoadingState::Idle if state.spec_source.is_none() => {
            render_empty_message(frame, inner, "No spec source configured\n\nPress [,] to set one");
            return;
        }
        _ => {}
    }

    // Filter line while typing
    let reserved = match state.endpoints.filter_editor() {
        Some(editor) => {
            let mut line = vec![Span::styled("/", header_style())];
            line.extend(
                editor_lines(editor, Style::default().fg(Color::Yellow))
                    .into_iter()
                    .flat_map(|l| l.spans),
            );
            frame.render_widget(Paragraph::new(Line::from(line)), inner);
            1
        }
        None => 0,
    };

    let rows = state.endpoints.rows();
    if rows.is_empty() {
        let message = if filter.is_empty() {
            "No endpoints found"
        } else {
            "No matching endpoints\n\nPress [Esc] or [Ctrl+L] to clear the filter"
        };
        let area = Rect {
            y: inner.y + reserved as u16,
            height: inner.height.saturating_sub(reserved as u16),
            ..inner
        };
        render_empty_message(frame, area, message);
        return;
    }

    let lines = rows
        .iter()
        .map(|row| endpoint_line(row, &state.endpoints))
        .collect();
    state.endpoints.page_size = page_size(inner);
    let cursor = state.endpoints.cursor();
    render_row_list(
        frame,
        inner,
        lines,
        cursor,
        &mut state.endpoints.viewport,
        reserved,
        focused,
    );
}

fn method_span(method: &str) -> Span<'static> {
    Span::styled(
        format!("{:width$}", method, width = METHOD_COLUMN_WIDTH),
        Style::default()
            .fg(get_method_color(method))
            .add_modifier(Modifier::BOLD),
    )
}

fn endpoint_line(row: &Row<usize>, panel: &EndpointListPanel) -> Line<'static> {
    match row {
        Row::GroupHeader {
            label,
            count,
            collapsed,
            ..
        } => Line::from(Span::styled(
            format!("{} {label} ({count})", fold_icon(*collapsed)),
            header_style(),
        )),
        Row::Leaf { item, depth } => {
            let Some(item) = panel.endpoint(*item) else {
                return Line::default();
            };
            let mut spans = vec![
                Span::raw(indent(*depth)),
                method_span(&item.method),
                Span::raw(" "),
                Span::raw(item.path.clone()),
            ];
            if let Some(summary) = &item.summary {
                spans.push(Span::styled(format!("  {summary}"), dim_style()));
            }
            Line::from(spans)
        }
        Row::Marker { label, depth, .. } => {
            Line::styled(format!("{}{label}", indent(*depth)), dim_style())
        }
    }
}

// ============================================================================
// Detail
// ============================================================================

pub fn render_detail_panel(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let focused = state.focus == PanelFocus::Detail;
    let block = panel_block("[2] Detail".to_string(), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(endpoint) = state.detail.subject().cloned() else {
        render_empty_message(frame, inner, "No endpoint selected");
        return;
    };

    // First line: endpoint, or breadcrumbs when drilled into a schema
    let mut head = vec![method_span(&endpoint.method), Span::raw(endpoint.path.clone())];
    match state.detail.view() {
        NavigatorView::Base => {
            if let Some(summary) = endpoint.summary.as_ref().or(endpoint.description.as_ref()) {
                head.push(Span::styled(format!("  {summary}"), dim_style()));
            }
        }
        NavigatorView::DrillDown => {
            head.push(Span::styled(" › ", dim_style()));
            head.push(Span::styled(
                state.detail.breadcrumbs().join(" › "),
                header_style(),
            ));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(head)), inner);

    let rows = state.detail.rows(&state.spec.schemas);
    if rows.is_empty() {
        let area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        render_empty_message(frame, area, "No parameters, body or responses");
        return;
    }

    let lines = rows.iter().map(detail_line).collect();
    state.detail.page_size = page_size(inner);
    let cursor = state.detail.cursor();
    render_row_list(
        frame,
        inner,
        lines,
        cursor,
        &mut state.detail.viewport,
        1,
        focused,
    );
}

fn field_spans(field: &SchemaField) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if let Some(name) = &field.name {
        spans.push(Span::raw(name.clone()));
        if field.required {
            spans.push(Span::styled("*", Style::default().fg(Color::Red)));
        }
        spans.push(Span::raw(": "));
    }
    spans.push(Span::styled(
        field.type_summary.clone(),
        Style::default().fg(Color::Green),
    ));
    if field.circular {
        spans.push(Span::styled(" ↺", dim_style()));
    } else if field.reference.is_some() {
        spans.push(Span::styled(" →", dim_style()));
    }
    spans
}

fn detail_line(row: &Row<DetailItem>) -> Line<'static> {
    match row {
        Row::GroupHeader {
            label,
            count,
            collapsed,
            depth,
            item,
            ..
        } => {
            let mut spans = vec![Span::raw(format!("{}{} ", indent(*depth), fold_icon(*collapsed)))];
            match item {
                Some(DetailItem::Field(field)) => spans.extend(field_spans(field)),
                Some(DetailItem::Parameter(param)) => spans.push(Span::raw(param.name.clone())),
                Some(DetailItem::Text(text)) => spans.push(Span::raw(text.clone())),
                None if *depth == 0 => {
                    spans.push(Span::styled(format!("{label} ({count})"), header_style()))
                }
                None => spans.push(Span::raw(label.clone())),
            }
            Line::from(spans)
        }
        Row::Leaf { item, depth } => {
            let mut spans = vec![Span::raw(format!("{}  ", indent(*depth)))];
            match item {
                DetailItem::Parameter(param) => {
                    spans.push(Span::raw(param.name.clone()));
                    if param.required {
                        spans.push(Span::styled("*", Style::default().fg(Color::Red)));
                    }
                    spans.push(Span::styled(
                        format!(" ({})", param.location.as_str()),
                        dim_style(),
                    ));
                    if let Some(schema) = &param.schema {
                        spans.push(Span::styled(
                            format!(" {}", schema.type_summary()),
                            Style::default().fg(Color::Green),
                        ));
                    }
                    if let Some(description) = &param.description {
                        spans.push(Span::styled(format!("  {description}"), dim_style()));
                    }
                }
                DetailItem::Field(field) => spans.extend(field_spans(field)),
                DetailItem::Text(text) => spans.push(Span::raw(text.clone())),
            }
            Line::from(spans)
        }
        Row::Marker { kind, label, depth } => {
            let style = match kind {
                MarkerKind::Composition => Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::ITALIC),
                MarkerKind::Truncated => dim_style().add_modifier(Modifier::ITALIC),
            };
            Line::styled(format!("{}  {label}", indent(*depth)), style)
        }
    }
}

// ============================================================================
// Request
// ============================================================================

pub fn render_request_panel(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let focused = state.focus == PanelFocus::Request;
    let title = if state.request.is_executing() {
        "[3] Request (...)".to_string()
    } else {
        "[3] Request".to_string()
    };
    let block = panel_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.request.subject().is_none() {
        render_empty_message(frame, inner, "No endpoint selected");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(3)])
        .split(inner);

    render_request_fields(frame, chunks[0], state, focused);

    let response_area = chunks[1];
    let separator = Paragraph::new(Line::styled(
        "─".repeat(response_area.width as usize),
        dim_style(),
    ));
    frame.render_widget(separator, response_area);
    let response_area = Rect {
        y: response_area.y + 1,
        height: response_area.height.saturating_sub(1),
        ..response_area
    };

    let show_headers = state.request.shows_headers();
    if let Some(line_count) = state
        .request
        .response()
        .map(|response| response_line_count(response, show_headers))
    {
        state.request.clamp_response_scroll(line_count);
    }
    render_response(
        frame,
        response_area,
        state.request.response(),
        state.request.is_executing(),
        state.request.response_scroll(),
        show_headers,
    );
}

fn render_request_fields(frame: &mut Frame, area: Rect, state: &mut AppState, focused: bool) {
    // A body being edited takes the whole field area
    if let Some((RequestField::Body, editor)) = state.request.editor() {
        let mode = match editor.mode() {
            EditorMode::Insert => "-- INSERT --",
            EditorMode::Normal => "-- NORMAL --",
        };
        let mut lines = vec![Line::from(vec![
            Span::styled("Body ", header_style()),
            Span::styled(mode, Style::default().fg(Color::Yellow)),
        ])];
        let body = editor_lines(editor, Style::default());
        let (cursor_line, _) = editor.cursor_line_col();
        let visible = (area.height as usize).saturating_sub(1).max(1);
        let skip = (cursor_line + 1).saturating_sub(visible);
        lines.extend(body.into_iter().skip(skip));
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    let rows = state.request.rows();
    if rows.is_empty() {
        render_empty_message(frame, area, "Nothing to configure");
        return;
    }

    let view: &AppState = state;
    let lines = rows.iter().map(|row| request_line(row, view)).collect();
    state.request.page_size = page_size(area);
    let cursor = state.request.cursor();
    render_row_list(
        frame,
        area,
        lines,
        cursor,
        &mut state.request.viewport,
        0,
        focused,
    );
}

fn request_line(row: &Row<RequestField>, state: &AppState) -> Line<'static> {
    match row {
        Row::GroupHeader {
            label,
            count,
            collapsed,
            ..
        } => Line::from(Span::styled(
            format!("{} {label} ({count})", fold_icon(*collapsed)),
            header_style(),
        )),
        Row::Leaf { item, depth } => {
            let mut spans = vec![Span::raw(indent(*depth))];
            let editing = state
                .request
                .editor()
                .filter(|(field, _)| *field == item)
                .map(|(_, editor)| editor);

            match item {
                RequestField::Param { name, required, .. } => {
                    spans.push(Span::raw(name.clone()));
                    if *required {
                        spans.push(Span::styled("*", Style::default().fg(Color::Red)));
                    }
                    spans.push(Span::raw(" = "));
                }
                RequestField::Body => spans.push(Span::raw("body: ")),
            }

            match editing {
                Some(editor) => spans.extend(
                    editor_lines(editor, Style::default().fg(Color::Yellow))
                        .into_iter()
                        .flat_map(|line| line.spans),
                ),
                None => {
                    let value = state.request.field_value(item);
                    let first_line = value.lines().next().unwrap_or_default().to_string();
                    if first_line.is_empty() {
                        spans.push(Span::styled("(empty)", dim_style()));
                    } else {
                        let more = value.lines().count() > 1;
                        spans.push(Span::styled(first_line, Style::default().fg(Color::Yellow)));
                        if more {
                            spans.push(Span::styled(" …", dim_style()));
                        }
                    }
                }
            }
            Line::from(spans)
        }
        Row::Marker { label, .. } => Line::styled(label.clone(), dim_style()),
    }
}
