//! Panel orchestrators
//!
//! Each panel wires the shared row, cursor and viewport primitives to its own
//! content and owns its collapse and selection state:
//! - `endpoints`: tag groups of endpoints with a filter box
//! - `detail`: parameters, request body and responses of one endpoint, with
//!   drill-down into referenced schemas
//! - `request`: editable request values and the last response

pub mod detail;
pub mod endpoints;
pub mod request;

pub use detail::{DetailItem, DetailPanel};
pub use endpoints::{group_endpoints, EndpointListPanel};
pub use request::{RequestField, RequestPanel};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::rows::Cursor;
use crate::types::ApiEndpoint;

/// Something a panel wants the shell to act on
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    None,
    /// Enter on an endpoint row
    EndpointSelected(ApiEndpoint),
    SendRequest,
    Status(String),
}

/// Shared list motions: j/k, arrows, g/G and paging.
/// Returns true if the key moved (or tried to move) the cursor.
pub fn handle_list_motion(
    cursor: &mut Cursor,
    key: &KeyEvent,
    row_count: usize,
    page: usize,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down if !ctrl => cursor.move_down(row_count),
        KeyCode::Char('k') | KeyCode::Up if !ctrl => cursor.move_up(row_count),
        KeyCode::Char('g') | KeyCode::Home => cursor.first(),
        KeyCode::Char('G') | KeyCode::End => cursor.last(row_count),
        KeyCode::PageDown => cursor.page_down(page, row_count),
        KeyCode::PageUp => cursor.page_up(page, row_count),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_list_motion_keys() {
        let mut cursor = Cursor::new();
        assert!(handle_list_motion(&mut cursor, &key(KeyCode::Char('j')), 10, 4));
        assert_eq!(cursor.index(), 1);
        handle_list_motion(&mut cursor, &key(KeyCode::Char('G')), 10, 4);
        assert_eq!(cursor.index(), 9);
        handle_list_motion(&mut cursor, &key(KeyCode::PageUp), 10, 4);
        assert_eq!(cursor.index(), 5);
        handle_list_motion(&mut cursor, &key(KeyCode::Char('g')), 10, 4);
        assert_eq!(cursor.index(), 0);
        assert!(!handle_list_motion(&mut cursor, &key(KeyCode::Char('x')), 10, 4));
    }
}
