//! Endpoint detail panel
//!
//! The base view lists the endpoint's parameters, request body and responses
//! as collapsible sections. Enter on a row that refers to a named schema
//! drills into it; the drill-down view shows that schema's fields under a
//! breadcrumb line and Backspace/Delete/Esc walk back out.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use super::{handle_list_motion, PanelEvent};
use crate::navigator::{NavigatorView, TypeNavigator};
use crate::rows::{cursor_after_toggle, enclosing_header, CollapseSet, Cursor, Row};
use crate::schema_rows::{
    flatten_schema_children, flatten_schema_field, SchemaField, SchemaRowOptions,
};
use crate::types::{ApiEndpoint, ApiParameter, Schema, SchemaRegistry};
use crate::viewport::ViewportState;

pub const PARAMETERS_SECTION: &str = "params";
pub const BODY_SECTION: &str = "body";
pub const RESPONSES_SECTION: &str = "responses";

/// Content of one detail row
#[derive(Debug, Clone, PartialEq)]
pub enum DetailItem {
    Parameter(ApiParameter),
    Field(SchemaField),
    Text(String),
}

impl DetailItem {
    /// Named schema this row points at
    pub fn reference(&self) -> Option<&str> {
        match self {
            DetailItem::Parameter(param) => param.schema.as_ref().and_then(Schema::reference),
            DetailItem::Field(field) => field.reference.as_deref(),
            DetailItem::Text(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct DetailPanel {
    subject: Option<ApiEndpoint>,
    navigator: TypeNavigator<Schema>,
    collapsed: CollapseSet,
    cursor: Cursor,
    /// Cursor positions of the levels below the current drill-down
    cursor_stack: Vec<usize>,
    pub viewport: ViewportState,
    pub page_size: usize,
    options: SchemaRowOptions,
}

impl Default for DetailPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn field_rows(rows: Vec<Row<SchemaField>>) -> impl Iterator<Item = Row<DetailItem>> {
    rows.into_iter().map(|row| match row {
        Row::GroupHeader {
            id,
            label,
            count,
            collapsed,
            depth,
            item,
        } => Row::GroupHeader {
            id,
            label,
            count,
            collapsed,
            depth,
            item: item.map(DetailItem::Field),
        },
        Row::Leaf { item, depth } => Row::Leaf {
            item: DetailItem::Field(item),
            depth,
        },
        Row::Marker { kind, label, depth } => Row::Marker { kind, label, depth },
    })
}

impl DetailPanel {
    pub fn new() -> Self {
        Self {
            subject: None,
            navigator: TypeNavigator::new(),
            collapsed: CollapseSet::expanded(),
            cursor: Cursor::new(),
            cursor_stack: Vec::new(),
            viewport: ViewportState::new(),
            page_size: 10,
            options: SchemaRowOptions::default(),
        }
    }

    pub fn subject(&self) -> Option<&ApiEndpoint> {
        self.subject.as_ref()
    }

    /// Show a different endpoint. Drill-down, collapse state and cursor start
    /// over whenever the endpoint identity changes.
    pub fn set_subject(&mut self, endpoint: Option<ApiEndpoint>) {
        let old_key = self.subject.as_ref().map(ApiEndpoint::key);
        let new_key = endpoint.as_ref().map(ApiEndpoint::key);
        self.subject = endpoint;
        if old_key != new_key {
            self.navigator.reset();
            self.collapsed = CollapseSet::expanded();
            self.cursor = Cursor::new();
            self.cursor_stack.clear();
            self.viewport.reset();
        }
    }

    pub fn view(&self) -> NavigatorView {
        self.navigator.view()
    }

    pub fn breadcrumbs(&self) -> Vec<&str> {
        self.navigator.breadcrumbs()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    pub fn rows(&self, registry: &SchemaRegistry) -> Vec<Row<DetailItem>> {
        match self.navigator.current() {
            Some(schema) => {
                let prefix = format!(
                    "drill:{}:{}",
                    self.navigator.depth(),
                    self.navigator.current_label().unwrap_or_default()
                );
                field_rows(flatten_schema_children(
                    schema,
                    registry,
                    &self.collapsed,
                    &prefix,
                    0,
                    self.options,
                ))
                .collect()
            }
            None => self.base_rows(registry),
        }
    }

    fn section_header(&self, id: &str, label: &str, count: usize) -> (Row<DetailItem>, bool) {
        let collapsed = self.collapsed.is_collapsed(id);
        let row = Row::GroupHeader {
            id: id.to_string(),
            label: label.to_string(),
            count,
            collapsed,
            depth: 0,
            item: None,
        };
        (row, collapsed)
    }

    fn base_rows(&self, registry: &SchemaRegistry) -> Vec<Row<DetailItem>> {
        let Some(endpoint) = &self.subject else {
            return Vec::new();
        };
        let mut rows = Vec::new();

        if !endpoint.parameters.is_empty() {
            let (header, collapsed) =
                self.section_header(PARAMETERS_SECTION, "Parameters", endpoint.parameters.len());
            rows.push(header);
            if !collapsed {
                rows.extend(endpoint.parameters.iter().map(|param| Row::Leaf {
                    item: DetailItem::Parameter(param.clone()),
                    depth: 1,
                }));
            }
        }

        if let Some(body) = &endpoint.request_body {
            let (header, collapsed) = self.section_header(BODY_SECTION, "Request Body", 1);
            rows.push(header);
            if !collapsed {
                let label = if body.required {
                    format!("{} (required)", body.content_type)
                } else {
                    body.content_type.clone()
                };
                match &body.schema {
                    Some(schema) => rows.extend(field_rows(flatten_schema_field(
                        &label,
                        schema,
                        registry,
                        &self.collapsed,
                        "body.schema",
                        1,
                        self.options,
                    ))),
                    None => rows.push(Row::Leaf {
                        item: DetailItem::Text(label),
                        depth: 1,
                    }),
                }
            }
        }

        if !endpoint.responses.is_empty() {
            let (header, collapsed) =
                self.section_header(RESPONSES_SECTION, "Responses", endpoint.responses.len());
            rows.push(header);
            if !collapsed {
                for response in &endpoint.responses {
                    let label = match &response.description {
                        Some(description) => format!("{} {description}", response.status),
                        None => response.status.clone(),
                    };
                    match &response.schema {
                        Some(schema) => rows.extend(field_rows(flatten_schema_field(
                            &label,
                            schema,
                            registry,
                            &self.collapsed,
                            &format!("resp:{}", response.status),
                            1,
                            self.options,
                        ))),
                        None => rows.push(Row::Leaf {
                            item: DetailItem::Text(label),
                            depth: 1,
                        }),
                    }
                }
            }
        }

        rows
    }

    /// Drill into a named schema
    pub fn push_schema(&mut self, name: &str) {
        debug!(schema = name, depth = self.navigator.depth() + 1, "drill down");
        self.cursor_stack.push(self.cursor.index());
        self.navigator.push(Schema::Ref(name.to_string()), name);
        self.cursor = Cursor::new();
        self.viewport.reset();
    }

    /// Walk one level back out; nothing happens in the base view
    pub fn pop(&mut self, registry: &SchemaRegistry) {
        if self.navigator.pop().is_none() {
            return;
        }
        let previous = self.cursor_stack.pop().unwrap_or(0);
        self.cursor.set(previous, self.rows(registry).len());
        self.viewport.reset();
    }

    pub fn handle_key(&mut self, key: KeyEvent, registry: &SchemaRegistry) -> PanelEvent {
        let rows = self.rows(registry);
        if handle_list_motion(&mut self.cursor, &key, rows.len(), self.page_size) {
            return PanelEvent::None;
        }

        let index = self.cursor.index();
        match key.code {
            KeyCode::Enter => {
                let Some(row) = rows.get(index) else {
                    return PanelEvent::None;
                };
                if let Some(name) = row.item().and_then(DetailItem::reference) {
                    if registry.contains_key(name) {
                        self.push_schema(name);
                        return PanelEvent::None;
                    }
                }
                if row.is_header() {
                    self.toggle_at(&rows, index, registry);
                }
            }
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Esc => self.pop(registry),
            KeyCode::Char('h') | KeyCode::Left => {
                let header = if rows.get(index).is_some_and(Row::is_header) {
                    Some(index)
                } else {
                    enclosing_header(&rows, index)
                };
                if let Some(header) = header {
                    if matches!(rows[header], Row::GroupHeader { collapsed: false, .. }) {
                        self.toggle_at(&rows, header, registry);
                    }
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if matches!(rows.get(index), Some(Row::GroupHeader { collapsed: true, .. })) {
                    self.toggle_at(&rows, index, registry);
                }
            }
            _ => {}
        }
        PanelEvent::None
    }

    fn toggle_at(&mut self, before: &[Row<DetailItem>], header: usize, registry: &SchemaRegistry) {
        let Some(id) = before.get(header).and_then(Row::group_id) else {
            return;
        };
        self.collapsed.toggle(id);
        let after = self.rows(registry).len();
        let index = cursor_after_toggle(before, header, self.cursor.index(), after);
        self.cursor.set(index, after);
    }
}
