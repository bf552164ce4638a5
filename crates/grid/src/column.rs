//! Declarative column and action descriptors.

use std::sync::Arc;

use serde_json::Value;

pub type CellRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
pub type RowActionRenderer<T> = Arc<dyn Fn(&T) -> Vec<ActionItem> + Send + Sync>;
pub type BatchActionRenderer<T> = Arc<dyn Fn(&[T]) -> Vec<ActionItem> + Send + Sync>;

/// Placeholder shown for null, missing or empty values.
pub const EMPTY_CELL: &str = "--";

pub struct ColumnSpec<T> {
    pub key: String,
    pub label: String,
    render: Option<CellRenderer<T>>,
}

impl<T> ColumnSpec<T> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            render: None,
        }
    }

    pub fn render_with(mut self, render: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// `fields` is the row serialized to JSON; only consulted when no renderer is set.
    pub fn render_cell(&self, row: &T, fields: &Value) -> String {
        match &self.render {
            Some(render) => render(row),
            None => display_value(fields.get(&self.key).unwrap_or(&Value::Null)),
        }
    }
}

impl<T> Clone for ColumnSpec<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            render: self.render.clone(),
        }
    }
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_CELL.to_string(),
        Value::String(s) if s.is_empty() => EMPTY_CELL.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.is_empty() => EMPTY_CELL.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirm {
    pub title: String,
    pub description: String,
}

/// An actionable element attached to a row or to the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub key: String,
    pub label: String,
    pub confirm: Option<Confirm>,
}

impl ActionItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            confirm: None,
        }
    }

    pub fn confirmed(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.confirm = Some(Confirm {
            title: title.into(),
            description: description.into(),
        });
        self
    }
}
