//! Upload template loading.
//!
//! The marketplace template is described by a JSON side file extracted from
//! the vendor workbook: the ordered `columns` row (the [`TargetSchema`]) plus
//! the framing rows that must precede data rows verbatim.
//!
//! ```json
//! {
//!   "settings":     ["settings=..."],
//!   "instructions": ["..."],
//!   "categories":   ["..."],
//!   "columns":      ["SKU", "Item Name", "Bullet Point", "Bullet Point"],
//!   "attributes":   ["contribution_sku#1.value", "..."],
//!   "example_row":  ["ABC123", "..."]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TemplateError, TemplateResult};
use crate::models::TargetSchema;

/// Template headers as stored in the side file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateHeaders {
    #[serde(default)]
    pub settings: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub columns: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub example_row: Vec<String>,
}

impl TemplateHeaders {
    /// Parse headers from JSON.
    pub fn from_json(json: &str) -> TemplateResult<Self> {
        let headers: Self = serde_json::from_str(json)?;
        if headers.columns.is_empty() {
            return Err(TemplateError::NoColumns);
        }
        Ok(headers)
    }

    /// Load headers from a side file.
    pub fn load<P: AsRef<Path>>(path: P) -> TemplateResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// The ordered column names.
    pub fn schema(&self) -> TargetSchema {
        TargetSchema::new(self.columns.clone())
    }

    /// Framing rows in output order, each fitted to the column count.
    pub fn framing_rows(&self, include_example_row: bool) -> Vec<Vec<String>> {
        let width = self.columns.len();
        let mut rows = vec![
            fit(&self.settings, width),
            fit(&self.instructions, width),
            fit(&self.categories, width),
            fit(&self.columns, width),
            fit(&self.attributes, width),
        ];
        if include_example_row {
            rows.push(fit(&self.example_row, width));
        }
        rows
    }
}

/// Pad with empty cells or cut to exactly `width`.
fn fit(row: &[String], width: usize) -> Vec<String> {
    let mut fitted: Vec<String> = row.iter().take(width).cloned().collect();
    fitted.resize(width, String::new());
    fitted
}
