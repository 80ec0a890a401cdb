//! UI drawing module
//!
//! - `components`: shared pieces (header, footer, row list, editor line)
//! - `modals`: token, spec source and help overlays
//! - `panels`: the three main panels
//! - `response`: response view inside the request panel
//! - `styling`: colors and style constants

mod components;
mod modals;
mod panels;
mod response;
mod styling;

pub use response::{sorted_headers, try_format_json};

use crate::state::AppState;
use crate::types::PanelFocus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Draw one frame. Takes the state mutably because panels record their
/// scroll offsets and page sizes while rendering.
pub fn draw(frame: &mut Frame, state: &mut AppState, spinner_index: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    components::render_header(frame, chunks[0], state);
    render_body(frame, chunks[1], state, spinner_index);
    components::render_footer(frame, chunks[2], state);

    modals::render_overlay(frame, state);
}

fn render_body(frame: &mut Frame, area: Rect, state: &mut AppState, spinner_index: usize) {
    if state.fullscreen {
        match state.focus {
            PanelFocus::Endpoints => {
                panels::render_endpoints_panel(frame, area, state, spinner_index)
            }
            PanelFocus::Detail => panels::render_detail_panel(frame, area, state),
            PanelFocus::Request => panels::render_request_panel(frame, area, state),
        }
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    panels::render_endpoints_panel(frame, columns[0], state, spinner_index);
    panels::render_detail_panel(frame, right[0], state);
    panels::render_request_panel(frame, right[1], state);
}
