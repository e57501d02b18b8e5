//! Domain models for the conversion pipeline.
//!
//! - [`SourceRecord`] - One raw row of the storefront export
//! - [`ParentContext`] - Shared fields inherited by variant rows
//! - [`ReconstructedRecord`] - A keyed row merged with its parent context
//! - [`ProductFamily`] - Variants sharing one parent title
//! - [`TargetSchema`] - Ordered template columns, duplicates allowed
//! - [`TargetRecord`] - Resolved value per template column name
//! - [`BulletSequence`] - Exactly five bullet strings
//! - [`Role`] - Standalone, parent or child output row

pub mod columns;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use columns::source;

/// Number of bullet slots every output row carries.
pub const BULLET_SLOTS: usize = 5;

// =============================================================================
// Source side
// =============================================================================

/// One row from the storefront export, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord(IndexMap<String, String>);

impl SourceRecord {
    pub fn new(fields: IndexMap<String, String>) -> Self {
        Self(fields)
    }

    /// Value of a column, empty when the export does not have it.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Shared product fields carried forward from the last row that declared a title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentContext {
    pub title: String,
    pub body_html: String,
    pub handle: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: String,
    pub color_code: String,
    pub make: String,
}

impl ParentContext {
    /// Capture the shared fields of a parent-defining row.
    pub fn from_row(row: &SourceRecord) -> Self {
        Self {
            title: row.get(source::TITLE).to_string(),
            body_html: row.get(source::BODY_HTML).to_string(),
            handle: row.get(source::HANDLE).to_string(),
            vendor: row.get(source::VENDOR).to_string(),
            product_type: row.get(source::TYPE).to_string(),
            tags: row.get(source::TAGS).to_string(),
            color_code: row.get(source::COLOR_CODE).to_string(),
            make: row.get(source::MAKE).to_string(),
        }
    }
}

/// A keyed export row merged with the parent context active at its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedRecord {
    /// Trimmed variant SKU, never empty.
    pub key: String,
    /// The row's own fields.
    pub fields: SourceRecord,
    /// Inherited fields.
    pub parent: ParentContext,
}

impl ReconstructedRecord {
    /// Own value of a source column.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name)
    }

    /// Inherited title, falling back to the row's own.
    pub fn title(&self) -> &str {
        if self.parent.title.is_empty() {
            self.field(source::TITLE)
        } else {
            &self.parent.title
        }
    }

    /// Own description markup when present, inherited otherwise.
    pub fn body_html(&self) -> &str {
        let own = self.field(source::BODY_HTML).trim();
        if own.is_empty() {
            &self.parent.body_html
        } else {
            own
        }
    }

    /// Trimmed first option value (size or colour name).
    pub fn option_value(&self) -> &str {
        self.field(source::OPTION1_VALUE).trim()
    }

    /// Variant image, falling back to the product image.
    pub fn image(&self) -> &str {
        let variant = self.field(source::VARIANT_IMAGE);
        if variant.is_empty() {
            self.field(source::IMAGE_SRC)
        } else {
            variant
        }
    }
}

/// Variants grouped under one parent title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFamily {
    pub title: String,
    pub members: Vec<ReconstructedRecord>,
}

impl ProductFamily {
    /// The member a synthetic parent row is derived from.
    pub fn first(&self) -> Option<&ReconstructedRecord> {
        self.members.first()
    }
}

// =============================================================================
// Target side
// =============================================================================

/// One schema position: the column name and how many times it appeared before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaPosition<'a> {
    pub name: &'a str,
    pub occurrence: usize,
}

/// Ordered template columns. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSchema {
    columns: Vec<String>,
}

impl TargetSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Positions with their occurrence index, derived from column order.
    pub fn positions(&self) -> Vec<SchemaPosition<'_>> {
        let mut seen: IndexMap<&str, usize> = IndexMap::new();
        self.columns
            .iter()
            .map(|name| {
                let counter = seen.entry(name.as_str()).or_insert(0);
                let position = SchemaPosition { name, occurrence: *counter };
                *counter += 1;
                position
            })
            .collect()
    }

    /// Distinct column names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut seen = indexmap::IndexSet::new();
        self.columns
            .iter()
            .filter(move |name| seen.insert(name.as_str()))
            .map(String::as_str)
    }

    /// Names declared more than once, with their count.
    pub fn repeated(&self) -> Vec<(&str, usize)> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for name in &self.columns {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
        counts.into_iter().filter(|(_, count)| *count > 1).collect()
    }
}

/// Resolved value per template column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetRecord(IndexMap<String, String>);

impl TargetRecord {
    /// Every schema name present with an empty value.
    pub fn for_schema(schema: &TargetSchema) -> Self {
        Self(schema.names().map(|name| (name.to_string(), String::new())).collect())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn clear(&mut self, name: &str) {
        if let Some(value) = self.0.get_mut(name) {
            value.clear();
        }
    }

    /// Value of a field, empty when the mapper never set it.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

/// Exactly [`BULLET_SLOTS`] bullet strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulletSequence([String; BULLET_SLOTS]);

impl BulletSequence {
    /// Take up to five items; missing slots get `padding`.
    pub fn from_items(items: Vec<String>, padding: &str) -> Self {
        let mut items = items.into_iter();
        Self(std::array::from_fn(|_| items.next().unwrap_or_else(|| padding.to_string())))
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// What an output row represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// One row per variant, no variation linkage.
    Standalone,
    /// Synthetic parent of a family.
    Parent { key: String },
    /// Variant linked to its family parent.
    Child { parent_key: String },
}

impl Role {
    pub fn parentage_label(&self) -> Option<&'static str> {
        match self {
            Role::Standalone => None,
            Role::Parent { .. } => Some("Parent"),
            Role::Child { .. } => Some("Child"),
        }
    }
}
