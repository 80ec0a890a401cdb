//! Viewport engine
//!
//! Computes which slice of a row list fits into a fixed terminal height while
//! keeping the cursor visible. Overflow indicators ("more above" / "more
//! below") take one line each, so the window is fitted twice: once with the
//! raw height, then again with whatever space the indicators leave over.

use std::ops::Range;

/// Visible window over a row list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub scroll_offset: usize,
    pub visible_count: usize,
    pub overflow_above: bool,
    pub overflow_below: bool,
}

impl Viewport {
    pub fn range(&self) -> Range<usize> {
        self.scroll_offset..self.scroll_offset + self.visible_count
    }

    pub fn indicator_lines(&self) -> usize {
        usize::from(self.overflow_above) + usize::from(self.overflow_below)
    }

    /// Rows hidden below the window
    pub fn hidden_below(&self, row_count: usize) -> usize {
        row_count.saturating_sub(self.scroll_offset + self.visible_count)
    }
}

/// Sticky scroll position owned by a single panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportState {
    offset: usize,
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Recompute the window, starting from the previous offset
    pub fn update(
        &mut self,
        row_count: usize,
        cursor: usize,
        available_height: usize,
        reserved_lines: usize,
    ) -> Viewport {
        let viewport = compute(
            self.offset,
            row_count,
            cursor,
            available_height,
            reserved_lines,
        );
        self.offset = viewport.scroll_offset;
        viewport
    }
}

/// Compute the visible window for `row_count` rows.
///
/// `previous_offset` makes scrolling sticky: the window only moves when the
/// cursor would otherwise leave it.
pub fn compute(
    previous_offset: usize,
    row_count: usize,
    cursor: usize,
    available_height: usize,
    reserved_lines: usize,
) -> Viewport {
    let raw_available = available_height.saturating_sub(reserved_lines).max(1);

    if row_count <= raw_available {
        return Viewport {
            scroll_offset: 0,
            visible_count: row_count,
            overflow_above: false,
            overflow_below: false,
        };
    }

    let cursor = cursor.min(row_count - 1);
    let mut offset = fit_offset(previous_offset, cursor, raw_available, row_count);
    let mut content_height = raw_available;
    let mut indicator_lines = 0;

    // Indicator lines only ever grow here, so this settles within two rounds.
    loop {
        let (above, below) = overflow_flags(offset, content_height, row_count);
        let needed = usize::from(above) + usize::from(below);
        if needed <= indicator_lines {
            break;
        }
        indicator_lines = needed;
        content_height = raw_available.saturating_sub(indicator_lines).max(1);
        offset = fit_offset(offset, cursor, content_height, row_count);
    }

    let (overflow_above, overflow_below) = overflow_flags(offset, content_height, row_count);

    Viewport {
        scroll_offset: offset,
        visible_count: content_height.min(row_count - offset),
        overflow_above,
        overflow_below,
    }
}

/// Move `offset` just enough to keep `cursor` inside a window of `window` rows
fn fit_offset(offset: usize, cursor: usize, window: usize, row_count: usize) -> usize {
    let mut offset = offset;
    if cursor < offset {
        offset = cursor;
    } else if cursor >= offset + window {
        offset = cursor + 1 - window;
    }
    offset.min(row_count.saturating_sub(window))
}

fn overflow_flags(offset: usize, window: usize, row_count: usize) -> (bool, bool) {
    (offset > 0, offset + window < row_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contains_cursor(vp: &Viewport, rows: usize, cursor: usize) {
        assert!(vp.scroll_offset + vp.visible_count <= rows, "{vp:?} rows={rows}");
        if rows > 0 {
            assert!(vp.range().contains(&cursor), "{vp:?} cursor={cursor}");
        }
    }

    #[test]
    fn test_no_scrolling_when_rows_fit() {
        let vp = compute(3, 5, 4, 10, 2);
        assert_eq!(
            vp,
            Viewport {
                scroll_offset: 0,
                visible_count: 5,
                overflow_above: false,
                overflow_below: false,
            }
        );
    }

    #[test]
    fn test_empty_list() {
        let vp = compute(0, 0, 0, 10, 0);
        assert_eq!(vp.visible_count, 0);
        assert!(!vp.overflow_above && !vp.overflow_below);
    }

    #[test]
    fn test_top_of_long_list_shows_only_below_indicator() {
        let vp = compute(0, 50, 0, 10, 0);
        assert_eq!(vp.scroll_offset, 0);
        assert_eq!(vp.visible_count, 9);
        assert!(!vp.overflow_above);
        assert!(vp.overflow_below);
    }

    #[test]
    fn test_indicator_lines_push_cursor_back_into_view() {
        // The cursor fits in the raw window but not once indicators take two lines
        let vp = compute(0, 20, 9, 10, 0);
        assert_eq!(vp.scroll_offset, 2);
        assert_eq!(vp.visible_count, 8);
        assert!(vp.overflow_above && vp.overflow_below);
        assert_contains_cursor(&vp, 20, 9);
    }

    #[test]
    fn test_bottom_of_list_has_no_below_indicator() {
        let vp = compute(0, 20, 19, 10, 0);
        assert!(vp.overflow_above);
        assert!(!vp.overflow_below);
        assert_eq!(vp.scroll_offset + vp.visible_count, 20);
        assert_contains_cursor(&vp, 20, 19);
    }

    #[test]
    fn test_reserved_lines_shrink_window() {
        let vp = compute(0, 20, 0, 10, 4);
        assert_eq!(vp.visible_count, 5);
    }

    #[test]
    fn test_tiny_height_still_shows_cursor() {
        let vp = compute(0, 20, 7, 1, 3);
        assert_eq!(vp.visible_count, 1);
        assert_eq!(vp.scroll_offset, 7);
    }

    #[test]
    fn test_sticky_offset_does_not_jump() {
        let mut state = ViewportState::new();
        let first = state.update(100, 30, 12, 0);
        assert_contains_cursor(&first, 100, 30);

        // Moving up inside the window keeps the same offset
        let second = state.update(100, 29, 12, 0);
        assert_eq!(first.scroll_offset, second.scroll_offset);
    }

    #[test]
    fn test_shrinking_row_count_clamps_offset() {
        let mut state = ViewportState::new();
        state.update(100, 90, 10, 0);
        let vp = state.update(12, 11, 10, 0);
        assert_contains_cursor(&vp, 12, 11);
        assert!(vp.scroll_offset <= 12 - vp.visible_count);
    }

    #[test]
    fn test_containment_across_heights_and_moves() {
        for rows in 0..40usize {
            for height in 1..14usize {
                for reserved in 0..3usize {
                    let mut state = ViewportState::new();
                    // walk down then back up
                    for cursor in (0..rows).chain((0..rows).rev()) {
                        let vp = state.update(rows, cursor, height, reserved);
                        assert_contains_cursor(&vp, rows, cursor);
                        let raw = height.saturating_sub(reserved).max(1);
                        if raw >= 3 {
                            assert!(vp.visible_count + vp.indicator_lines() <= raw);
                        }
                    }
                }
            }
        }
    }
}
