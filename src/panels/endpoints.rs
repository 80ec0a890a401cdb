use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::{handle_list_motion, PanelEvent};
use crate::editor::{EditOutcome, LineEditor};
use crate::rows::{
    cursor_after_toggle, enclosing_header, flatten_groups, matches_either, CollapseSet, Cursor,
    GroupSource, Row,
};
use crate::types::ApiEndpoint;
use crate::viewport::ViewportState;

/// Group name for endpoints without tags
pub const UNTAGGED_GROUP: &str = "Other";

/// Group endpoints by tag, as indices into `endpoints`. Groups are sorted by
/// name; endpoints inside a group by path, then method. An endpoint with
/// several tags appears in each.
pub fn group_endpoints(endpoints: &[ApiEndpoint]) -> Vec<GroupSource<usize>> {
    let mut grouped: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, endpoint) in endpoints.iter().enumerate() {
        if endpoint.tags.is_empty() {
            grouped
                .entry(UNTAGGED_GROUP.to_string())
                .or_default()
                .push(index);
        } else {
            for tag in &endpoint.tags {
                grouped.entry(tag.clone()).or_default().push(index);
            }
        }
    }

    grouped
        .into_iter()
        .map(|(name, mut items)| {
            items.sort_by(|&a, &b| {
                let (a, b) = (&endpoints[a], &endpoints[b]);
                a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method))
            });
            GroupSource {
                id: name.clone(),
                label: name,
                items,
            }
        })
        .collect()
}

fn endpoint_matches(endpoint: &ApiEndpoint, filter: &str) -> bool {
    matches_either(filter, &endpoint.path, endpoint.summary.as_deref())
}

#[derive(Debug)]
pub struct EndpointListPanel {
    endpoints: Vec<ApiEndpoint>,
    /// Rows refer to endpoints by index
    groups: Vec<GroupSource<usize>>,
    collapsed: CollapseSet,
    groups_expanded: bool,
    cursor: Cursor,
    pub viewport: ViewportState,
    /// Rows that fit on screen at the last render, used for paging
    pub page_size: usize,
    filter: String,
    filter_editor: Option<LineEditor>,
    batch_delay: Duration,
}

impl EndpointListPanel {
    pub fn new(groups_expanded: bool, batch_delay: Duration) -> Self {
        Self {
            endpoints: Vec::new(),
            groups: Vec::new(),
            collapsed: Self::initial_collapse(groups_expanded),
            groups_expanded,
            cursor: Cursor::new(),
            viewport: ViewportState::new(),
            page_size: 10,
            filter: String::new(),
            filter_editor: None,
            batch_delay,
        }
    }

    fn initial_collapse(groups_expanded: bool) -> CollapseSet {
        if groups_expanded {
            CollapseSet::expanded()
        } else {
            CollapseSet::collapsed()
        }
    }

    /// Replace the endpoint tree; collapse state starts over
    pub fn set_endpoints(&mut self, endpoints: &[ApiEndpoint]) {
        self.groups = group_endpoints(endpoints);
        self.endpoints = endpoints.to_vec();
        self.collapsed = Self::initial_collapse(self.groups_expanded);
        self.cursor = Cursor::new();
        self.viewport.reset();
        self.filter.clear();
        self.filter_editor = None;
        debug!(groups = self.groups.len(), "endpoint groups rebuilt");
    }

    pub fn endpoint(&self, index: usize) -> Option<&ApiEndpoint> {
        self.endpoints.get(index)
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Filter currently applied (the live editor text while capturing)
    pub fn active_filter(&self) -> String {
        match &self.filter_editor {
            Some(editor) => editor.text(),
            None => self.filter.clone(),
        }
    }

    pub fn filter_editor(&self) -> Option<&LineEditor> {
        self.filter_editor.as_ref()
    }

    pub fn is_capturing(&self) -> bool {
        self.filter_editor.is_some()
    }

    pub fn rows(&self) -> Vec<Row<usize>> {
        flatten_groups(
            &self.groups,
            &self.collapsed,
            &self.active_filter(),
            |&index, filter| {
                self.endpoints
                    .get(index)
                    .is_some_and(|endpoint| endpoint_matches(endpoint, filter))
            },
        )
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    /// Endpoint under the cursor, if the cursor is on one
    pub fn highlighted(&self) -> Option<ApiEndpoint> {
        self.highlighted_ref().cloned()
    }

    fn highlighted_ref(&self) -> Option<&ApiEndpoint> {
        let index = *self.rows().get(self.cursor.index())?.item()?;
        self.endpoints.get(index)
    }

    /// Identity of the endpoint under the cursor
    pub fn highlighted_key(&self) -> Option<String> {
        self.highlighted_ref().map(ApiEndpoint::key)
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let changed = self
            .filter_editor
            .as_mut()
            .is_some_and(|editor| editor.tick(now));
        if changed {
            self.cursor.clamp(self.rows().len());
        }
        changed
    }

    pub fn next_flush_in(&self, now: Instant) -> Option<Duration> {
        self.filter_editor
            .as_ref()
            .and_then(|editor| editor.next_flush_in(now))
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Some(editor) = self.filter_editor.as_mut() {
            editor.handle_paste(text);
            self.cursor.clamp(self.rows().len());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PanelEvent {
        if let Some(editor) = self.filter_editor.as_mut() {
            match editor.handle_key(key) {
                EditOutcome::Commit(value) => {
                    debug!(filter = %value, "filter applied");
                    self.filter = value;
                    self.filter_editor = None;
                }
                EditOutcome::Cancel => {
                    self.filter.clear();
                    self.filter_editor = None;
                }
                EditOutcome::Continue => {}
            }
            self.cursor.clamp(self.rows().len());
            return PanelEvent::None;
        }

        let rows = self.rows();
        if handle_list_motion(&mut self.cursor, &key, rows.len(), self.page_size) {
            return PanelEvent::None;
        }

        match key.code {
            KeyCode::Char('/') => {
                self.filter_editor =
                    Some(LineEditor::single_line(&self.filter).with_batch_delay(self.batch_delay));
            }
            KeyCode::Esc if !self.filter.is_empty() => self.clear_filter(),
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear_filter()
            }
            KeyCode::Enter | KeyCode::Char(' ') => match rows.get(self.cursor.index()) {
                Some(Row::GroupHeader { .. }) => self.toggle_at(&rows, self.cursor.index()),
                Some(row) => {
                    if let Some(endpoint) = row.item().and_then(|&i| self.endpoints.get(i)) {
                        return PanelEvent::EndpointSelected(endpoint.clone());
                    }
                }
                None => {}
            },
            KeyCode::Char('h') | KeyCode::Left => {
                let header = if rows.get(self.cursor.index()).is_some_and(Row::is_header) {
                    Some(self.cursor.index())
                } else {
                    enclosing_header(&rows, self.cursor.index())
                };
                if let Some(header) = header {
                    if matches!(rows[header], Row::GroupHeader { collapsed: false, .. }) {
                        self.toggle_at(&rows, header);
                    }
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let index = self.cursor.index();
                if matches!(rows.get(index), Some(Row::GroupHeader { collapsed: true, .. })) {
                    self.toggle_at(&rows, index);
                }
            }
            _ => {}
        }
        PanelEvent::None
    }

    fn clear_filter(&mut self) {
        self.filter.clear();
        self.cursor.clamp(self.rows().len());
    }

    /// Toggle the group whose header is at `header`
    fn toggle_at(&mut self, before: &[Row<usize>], header: usize) {
        let Some(id) = before.get(header).and_then(Row::group_id) else {
            return;
        };
        self.collapsed.toggle(id);
        let after = self.rows().len();
        let index = cursor_after_toggle(before, header, self.cursor.index(), after);
        self.cursor.set(index, after);
    }
}
