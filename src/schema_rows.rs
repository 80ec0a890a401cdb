//! Schema tree flattening
//!
//! Turns a [`Schema`] into rows for the detail panel. References are resolved
//! through the registry while walking; the set of references currently being
//! expanded is tracked per path (added on entry, removed on exit) so shared
//! schemas reached through different fields still render in full while a
//! schema that refers back to one of its own ancestors stops with a single
//! truncation row.

use crate::rows::{CollapseSet, MarkerKind, Row};
use crate::types::{Schema, SchemaRegistry};

/// Recursion stops below this many nested levels
pub const MAX_SCHEMA_DEPTH: usize = 20;

/// Display data for one schema row
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: Option<String>,
    pub type_summary: String,
    pub required: bool,
    /// Named schema this row points at (drill-down target)
    pub reference: Option<String>,
    pub circular: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SchemaRowOptions {
    /// Rows that come from a `$ref` start collapsed unless toggled
    pub refs_collapsed_by_default: bool,
}

impl Default for SchemaRowOptions {
    fn default() -> Self {
        Self {
            refs_collapsed_by_default: true,
        }
    }
}

struct Walker<'a> {
    registry: &'a SchemaRegistry,
    collapsed: &'a CollapseSet,
    options: SchemaRowOptions,
    ancestors: Vec<String>,
}

/// Rows for the inside of `schema` (its properties or members), starting at `depth`.
/// Used for drill-down views, where the schema itself is the breadcrumb.
pub fn flatten_schema_children(
    schema: &Schema,
    registry: &SchemaRegistry,
    collapsed: &CollapseSet,
    id_prefix: &str,
    depth: usize,
    options: SchemaRowOptions,
) -> Vec<Row<SchemaField>> {
    let mut walker = Walker {
        registry,
        collapsed,
        options,
        ancestors: Vec::new(),
    };
    let mut rows = Vec::new();

    match schema {
        Schema::Ref(name) => {
            if let Some(target) = registry.get(name) {
                walker.ancestors.push(name.clone());
                walker.children(target, id_prefix, depth, &mut rows);
                walker.ancestors.pop();
            }
        }
        other => walker.children(other, id_prefix, depth, &mut rows),
    }
    rows
}

/// Rows for `schema` shown as a single labelled field followed by its contents
pub fn flatten_schema_field(
    label: &str,
    schema: &Schema,
    registry: &SchemaRegistry,
    collapsed: &CollapseSet,
    id_prefix: &str,
    depth: usize,
    options: SchemaRowOptions,
) -> Vec<Row<SchemaField>> {
    let mut walker = Walker {
        registry,
        collapsed,
        options,
        ancestors: Vec::new(),
    };
    let mut rows = Vec::new();
    walker.field(Some(label), schema, false, id_prefix, depth, &mut rows);
    rows
}

impl Walker<'_> {
    fn resolve<'s>(&'s self, schema: &'s Schema) -> Option<&'s Schema> {
        match schema {
            Schema::Ref(name) => self.registry.get(name),
            other => Some(other),
        }
    }

    /// Whether a schema expands into child rows
    fn has_children(&self, schema: &Schema) -> bool {
        self.has_children_at(schema, 0)
    }

    fn has_children_at(&self, schema: &Schema, hops: usize) -> bool {
        if hops > MAX_SCHEMA_DEPTH {
            return false;
        }
        match schema {
            Schema::Object { properties, .. } => !properties.is_empty(),
            Schema::Array(items) => self.has_children_at(items, hops + 1),
            Schema::Composition { members, .. } => !members.is_empty(),
            Schema::Ref(name) => self
                .registry
                .get(name)
                .is_some_and(|target| self.has_children_at(target, hops + 1)),
            Schema::Primitive { .. } | Schema::Any => false,
        }
    }

    fn child_count(&self, schema: &Schema) -> usize {
        match self.resolve(schema) {
            Some(Schema::Object { properties, .. }) => properties.len(),
            Some(Schema::Composition { members, .. }) => members.len(),
            Some(Schema::Array(items)) => self.child_count(items),
            _ => 0,
        }
    }

    fn truncated(&self, depth: usize, rows: &mut Vec<Row<SchemaField>>) {
        rows.push(Row::Marker {
            kind: MarkerKind::Truncated,
            label: "(truncated)".to_string(),
            depth,
        });
    }

    /// One row for a named field, then its contents unless collapsed
    fn field(
        &mut self,
        name: Option<&str>,
        schema: &Schema,
        required: bool,
        path: &str,
        depth: usize,
        rows: &mut Vec<Row<SchemaField>>,
    ) {
        if depth > MAX_SCHEMA_DEPTH {
            self.truncated(depth, rows);
            return;
        }

        let reference = schema.reference().map(str::to_string);
        let unresolved = reference
            .as_ref()
            .is_some_and(|r| !self.registry.contains_key(r));
        let circular = reference
            .as_ref()
            .is_some_and(|r| self.ancestors.contains(r));

        let mut type_summary = schema.type_summary();
        if unresolved {
            type_summary.push_str(" (unresolved)");
        }

        let field = SchemaField {
            name: name.map(str::to_string),
            type_summary,
            required,
            reference: reference.clone(),
            circular,
        };

        if circular {
            rows.push(Row::Leaf { item: field, depth });
            rows.push(Row::Marker {
                kind: MarkerKind::Truncated,
                label: format!(
                    "(circular reference to {})",
                    reference.as_deref().unwrap_or_default()
                ),
                depth: depth + 1,
            });
            return;
        }

        if !self.has_children(schema) {
            rows.push(Row::Leaf { item: field, depth });
            return;
        }

        let default_collapsed = reference.is_some() && self.options.refs_collapsed_by_default;
        let collapsed = self.collapsed.is_collapsed_or(path, default_collapsed);
        rows.push(Row::GroupHeader {
            id: path.to_string(),
            label: name.unwrap_or(&field.type_summary).to_string(),
            count: self.child_count(schema),
            collapsed,
            depth,
            item: Some(field),
        });

        if !collapsed {
            self.children(schema, path, depth + 1, rows);
        }
    }

    /// Rows for the contents of a schema (not the schema's own row)
    fn children(
        &mut self,
        schema: &Schema,
        path: &str,
        depth: usize,
        rows: &mut Vec<Row<SchemaField>>,
    ) {
        if depth > MAX_SCHEMA_DEPTH {
            self.truncated(depth, rows);
            return;
        }

        match schema {
            Schema::Ref(name) => {
                if self.ancestors.contains(name) {
                    rows.push(Row::Marker {
                        kind: MarkerKind::Truncated,
                        label: format!("(circular reference to {name})"),
                        depth,
                    });
                    return;
                }
                let Some(target) = self.registry.get(name) else {
                    return;
                };
                self.ancestors.push(name.clone());
                self.children(target, path, depth, rows);
                self.ancestors.pop();
            }
            Schema::Object {
                properties,
                required,
            } => {
                for (prop_name, prop_schema) in properties {
                    let is_required = required.iter().any(|r| r == prop_name);
                    let child_path = format!("{path}.{prop_name}");
                    self.field(
                        Some(prop_name),
                        prop_schema,
                        is_required,
                        &child_path,
                        depth,
                        rows,
                    );
                }
            }
            Schema::Array(items) => {
                self.children(items, &format!("{path}[]"), depth, rows);
            }
            Schema::Composition { kind, members } => {
                rows.push(Row::Marker {
                    kind: MarkerKind::Composition,
                    label: kind.label().to_string(),
                    depth,
                });
                for (i, member) in members.iter().enumerate() {
                    let member_path = format!("{path}.{}[{i}]", kind.label());
                    match member {
                        Schema::Ref(name) => {
                            self.field(Some(name), member, false, &member_path, depth + 1, rows)
                        }
                        Schema::Object { .. } | Schema::Composition { .. } => {
                            self.children(member, &member_path, depth + 1, rows)
                        }
                        other => self.field(None, other, false, &member_path, depth + 1, rows),
                    }
                }
            }
            Schema::Primitive { .. } | Schema::Any => {}
        }
    }
}
