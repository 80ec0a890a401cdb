//! Row/cursor model
//!
//! Hierarchical sources (tag groups, schema trees) are flattened into a list
//! of [`Row`]s every time they are read. Nothing here stores rows: the same
//! (source, collapse set, filter) triple always yields the same list.

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Label of a composition (`allOf`/`oneOf`/`anyOf`)
    Composition,
    /// Recursion stopped here (depth cap or circular reference)
    Truncated,
}

/// One renderable line of a flattened tree
#[derive(Debug, Clone, PartialEq)]
pub enum Row<T> {
    GroupHeader {
        id: String,
        label: String,
        count: usize,
        collapsed: bool,
        depth: usize,
        /// Content carried by headers that also describe something (schema fields)
        item: Option<T>,
    },
    Leaf {
        item: T,
        depth: usize,
    },
    Marker {
        kind: MarkerKind,
        label: String,
        depth: usize,
    },
}

impl<T> Row<T> {
    pub fn depth(&self) -> usize {
        match self {
            Row::GroupHeader { depth, .. } | Row::Leaf { depth, .. } | Row::Marker { depth, .. } => {
                *depth
            }
        }
    }

    pub fn group_id(&self) -> Option<&str> {
        match self {
            Row::GroupHeader { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Row::GroupHeader { .. })
    }

    /// The payload of a leaf, or of a header that carries one
    pub fn item(&self) -> Option<&T> {
        match self {
            Row::Leaf { item, .. } => Some(item),
            Row::GroupHeader { item, .. } => item.as_ref(),
            Row::Marker { .. } => None,
        }
    }
}

/// Group ids whose collapse state differs from the default.
///
/// `expanded()` starts empty (everything open); `collapsed()` behaves as if
/// every possible id were present. Individual rows may also pass their own
/// default through [`CollapseSet::is_collapsed_or`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseSet {
    toggled: HashSet<String>,
    collapsed_by_default: bool,
}

impl CollapseSet {
    pub fn expanded() -> Self {
        Self {
            toggled: HashSet::new(),
            collapsed_by_default: false,
        }
    }

    pub fn collapsed() -> Self {
        Self {
            toggled: HashSet::new(),
            collapsed_by_default: true,
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.is_collapsed_or(id, self.collapsed_by_default)
    }

    pub fn is_collapsed_or(&self, id: &str, default: bool) -> bool {
        self.toggled.contains(id) != default
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.toggled.remove(id) {
            self.toggled.insert(id.to_string());
        }
    }

    pub fn set_collapsed(&mut self, id: &str, collapsed: bool, default: bool) {
        if collapsed == default {
            self.toggled.remove(id);
        } else {
            self.toggled.insert(id.to_string());
        }
    }

    pub fn collapse(&mut self, id: &str) {
        self.set_collapsed(id, true, self.collapsed_by_default);
    }

    pub fn expand(&mut self, id: &str) {
        self.set_collapsed(id, false, self.collapsed_by_default);
    }

    /// Forget every toggle, keeping the default
    pub fn clear(&mut self) {
        self.toggled.clear();
    }
}

/// Index into the current row list, always kept inside it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Re-clamp after the row count changed
    pub fn clamp(&mut self, row_count: usize) {
        self.index = self.index.min(row_count.saturating_sub(1));
    }

    pub fn set(&mut self, index: usize, row_count: usize) {
        self.index = index;
        self.clamp(row_count);
    }

    pub fn move_down(&mut self, row_count: usize) {
        self.set(self.index.saturating_add(1), row_count);
    }

    pub fn move_up(&mut self, row_count: usize) {
        self.set(self.index.saturating_sub(1), row_count);
    }

    pub fn first(&mut self) {
        self.index = 0;
    }

    pub fn last(&mut self, row_count: usize) {
        self.index = row_count.saturating_sub(1);
    }

    pub fn page_down(&mut self, page: usize, row_count: usize) {
        self.set(self.index.saturating_add(page.max(1)), row_count);
    }

    pub fn page_up(&mut self, page: usize, row_count: usize) {
        self.set(self.index.saturating_sub(page.max(1)), row_count);
    }
}

/// One named group of a two-level source (tag -> endpoints)
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSource<T> {
    pub id: String,
    pub label: String,
    pub items: Vec<T>,
}

/// Case-insensitive substring match on either of two fields
pub fn matches_either(needle: &str, primary: &str, secondary: Option<&str>) -> bool {
    let needle = needle.to_lowercase();
    primary.to_lowercase().contains(&needle)
        || secondary.is_some_and(|s| s.to_lowercase().contains(&needle))
}

/// Flatten groups into rows.
///
/// With an empty filter, every group contributes its header and, unless
/// collapsed, its items. With a filter, headers are dropped and only the
/// matching items are listed (each item once, even if several groups hold it).
pub fn flatten_groups<T, F>(
    groups: &[GroupSource<T>],
    collapsed: &CollapseSet,
    filter: &str,
    matches: F,
) -> Vec<Row<T>>
where
    T: Clone + Eq + Hash,
    F: Fn(&T, &str) -> bool,
{
    let mut rows = Vec::new();

    if !filter.is_empty() {
        let mut seen: HashSet<&T> = HashSet::new();
        for item in groups.iter().flat_map(|g| g.items.iter()) {
            if matches(item, filter) && seen.insert(item) {
                rows.push(Row::Leaf {
                    item: item.clone(),
                    depth: 0,
                });
            }
        }
        return rows;
    }

    for group in groups {
        let is_collapsed = collapsed.is_collapsed(&group.id);
        rows.push(Row::GroupHeader {
            id: group.id.clone(),
            label: group.label.clone(),
            count: group.items.len(),
            collapsed: is_collapsed,
            depth: 0,
            item: None,
        });
        if !is_collapsed {
            rows.extend(group.items.iter().map(|item| Row::Leaf {
                item: item.clone(),
                depth: 1,
            }));
        }
    }
    rows
}

/// Index one past the last descendant of the header at `header`
pub fn subtree_end<T>(rows: &[Row<T>], header: usize) -> usize {
    let Some(head) = rows.get(header) else {
        return header;
    };
    let depth = head.depth();
    rows[header + 1..]
        .iter()
        .position(|row| row.depth() <= depth)
        .map(|offset| header + 1 + offset)
        .unwrap_or(rows.len())
}

/// Index of the header whose subtree holds `index`. Rows nested under a
/// leaf (markers below a circular field) have no enclosing header.
pub fn enclosing_header<T>(rows: &[Row<T>], index: usize) -> Option<usize> {
    let depth = rows.get(index)?.depth();
    let parent = (0..index).rev().find(|&i| rows[i].depth() < depth)?;
    (rows[parent].is_header() && index < subtree_end(rows, parent)).then_some(parent)
}

/// Cursor position after the group at `header` was toggled.
///
/// The cursor keeps its index unless its row disappeared with the collapsed
/// group, in which case it lands on the group's header.
pub fn cursor_after_toggle<T>(
    before: &[Row<T>],
    header: usize,
    cursor: usize,
    rows_after: usize,
) -> usize {
    let removed = cursor > header && cursor < subtree_end(before, header);
    let collapsed_now = rows_after < before.len();
    if removed && collapsed_now {
        header
    } else {
        cursor.min(rows_after.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet_store() -> Vec<GroupSource<&'static str>> {
        vec![
            GroupSource {
                id: "pets".into(),
                label: "pets".into(),
                items: vec!["GET /pets", "POST /pets"],
            },
            GroupSource {
                id: "store".into(),
                label: "store".into(),
                items: vec!["GET /store/inventory"],
            },
        ]
    }

    fn text_match(item: &&'static str, filter: &str) -> bool {
        matches_either(filter, item, None)
    }

    #[test]
    fn test_headers_precede_children() {
        let rows = flatten_groups(&pet_store(), &CollapseSet::expanded(), "", text_match);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].group_id(), Some("pets"));
        assert_eq!(rows[1].item(), Some(&"GET /pets"));
        assert_eq!(rows[3].group_id(), Some("store"));
    }

    #[test]
    fn test_collapsed_group_emits_only_header() {
        let mut collapsed = CollapseSet::expanded();
        collapsed.collapse("pets");
        let rows = flatten_groups(&pet_store(), &collapsed, "", text_match);
        assert_eq!(rows.len(), 3);
        assert!(matches!(
            rows[0],
            Row::GroupHeader {
                collapsed: true,
                count: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_fully_populated_set_collapses_everything() {
        let rows = flatten_groups(&pet_store(), &CollapseSet::collapsed(), "", text_match);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(Row::is_header));
    }

    #[test]
    fn test_filter_drops_headers() {
        let rows = flatten_groups(
            &pet_store(),
            &CollapseSet::collapsed(),
            "inventory",
            text_match,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item(), Some(&"GET /store/inventory"));
        assert_eq!(rows.iter().filter(|r| r.is_header()).count(), 0);
    }

    #[test]
    fn test_filter_matches_either_field_case_insensitive() {
        assert!(matches_either("PETS", "/pets", Some("List")));
        assert!(matches_either("list", "/pets", Some("List all pets")));
        assert!(!matches_either("orders", "/pets", None));
    }

    #[test]
    fn test_filter_lists_shared_items_once() {
        let mut groups = pet_store();
        groups[1].items.push("GET /pets");
        let rows = flatten_groups(&groups, &CollapseSet::expanded(), "/pets", text_match);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_double_toggle_restores_rows() {
        let groups = pet_store();
        for initial in [CollapseSet::expanded(), CollapseSet::collapsed()] {
            let mut set = initial.clone();
            let before = flatten_groups(&groups, &set, "", text_match);
            set.toggle("store");
            set.toggle("store");
            assert_eq!(flatten_groups(&groups, &set, "", text_match), before);
            assert_eq!(set, initial);
        }
    }

    #[test]
    fn test_per_row_default() {
        let mut set = CollapseSet::expanded();
        assert!(set.is_collapsed_or("ref", true));
        set.set_collapsed("ref", false, true);
        assert!(!set.is_collapsed_or("ref", true));
        set.toggle("ref");
        assert!(set.is_collapsed_or("ref", true));
    }

    #[test]
    fn test_cursor_snaps_to_header_when_its_row_is_hidden() {
        let groups = pet_store();
        let mut set = CollapseSet::expanded();
        let before = flatten_groups(&groups, &set, "", text_match);
        set.toggle("pets");
        let after = flatten_groups(&groups, &set, "", text_match);
        assert_eq!(cursor_after_toggle(&before, 0, 2, after.len()), 0);
    }

    #[test]
    fn test_cursor_unchanged_when_row_survives_toggle() {
        let groups = pet_store();
        let mut set = CollapseSet::expanded();
        let before = flatten_groups(&groups, &set, "", text_match);
        set.toggle("store");
        let after = flatten_groups(&groups, &set, "", text_match);
        assert_eq!(cursor_after_toggle(&before, 3, 1, after.len()), 1);
        assert_eq!(cursor_after_toggle(&before, 3, 3, after.len()), 3);
    }

    #[test]
    fn test_enclosing_header_and_subtree_end() {
        let rows = flatten_groups(&pet_store(), &CollapseSet::expanded(), "", text_match);
        assert_eq!(enclosing_header(&rows, 2), Some(0));
        assert_eq!(enclosing_header(&rows, 3), None);
        assert_eq!(subtree_end(&rows, 0), 3);
        assert_eq!(subtree_end(&rows, 3), 5);
    }

    #[test]
    fn test_marker_under_leaf_has_no_enclosing_header() {
        let rows: Vec<Row<&str>> = vec![
            Row::GroupHeader {
                id: "category".into(),
                label: "category".into(),
                count: 1,
                collapsed: false,
                depth: 0,
                item: None,
            },
            Row::Leaf { item: "id", depth: 1 },
            Row::Leaf { item: "parent", depth: 0 },
            Row::Marker {
                kind: MarkerKind::Truncated,
                label: "(circular reference to Pet)".into(),
                depth: 1,
            },
        ];
        assert_eq!(enclosing_header(&rows, 1), Some(0));
        assert_eq!(enclosing_header(&rows, 3), None);
    }

    #[test]
    fn test_cursor_stays_clamped() {
        for rows in 0..6usize {
            let mut cursor = Cursor::new();
            let moves: [fn(&mut Cursor, usize); 6] = [
                Cursor::move_down,
                Cursor::move_down,
                Cursor::move_up,
                Cursor::last,
                |c, n| c.page_down(3, n),
                |c, n| c.page_up(2, n),
            ];
            for _ in 0..4 {
                for step in moves {
                    step(&mut cursor, rows);
                    assert!(cursor.index() <= rows.saturating_sub(1));
                }
            }
            cursor.last(rows);
            cursor.clamp(rows / 2);
            assert!(cursor.index() <= (rows / 2).saturating_sub(1));
        }
    }
}
