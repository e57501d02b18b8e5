//! Rebuild the parent/variant hierarchy of a storefront export.
//!
//! Exports are denormalized: only the first row of a product carries the
//! shared fields, the following variant rows leave them blank.
//!
//! ```text
//! Export rows                          Reconstructed records
//! ┌──────────────────────────────┐     ┌─────────────────────────────────┐
//! │ Title: Red Paint  SKU: RP-Q1 │     │ RP-Q1  parent.title = Red Paint │
//! │ Title:            SKU: RP-G1 │  →  │ RP-G1  parent.title = Red Paint │
//! │ Title:            SKU:       │     │ (dropped, no key)               │
//! │ Title: Blue       SKU: BL-Q1 │     │ BL-Q1  parent.title = Blue      │
//! └──────────────────────────────┘     └─────────────────────────────────┘
//! ```
//!
//! The scan is a fold: [`step`] takes the current [`ParentContext`] and one
//! row and returns the next context plus the record (if the row has a key).

use indexmap::IndexMap;

use crate::models::columns::source;
use crate::models::{ParentContext, ProductFamily, ReconstructedRecord, SourceRecord};

/// Output of a full scan.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    pub records: Vec<ReconstructedRecord>,
    /// Rows without a variant SKU.
    pub dropped: usize,
}

/// Advance the scan by one row.
///
/// A non-empty title starts a new parent and replaces the context wholesale.
/// The row becomes a record only when its trimmed SKU is non-empty; the
/// record sees the context *after* this row, so a parent row that is also a
/// variant inherits its own fields.
pub fn step(
    context: ParentContext,
    row: &SourceRecord,
) -> (ParentContext, Option<ReconstructedRecord>) {
    let context = if row.get(source::TITLE).trim().is_empty() {
        context
    } else {
        ParentContext::from_row(row)
    };

    let key = row.get(source::VARIANT_SKU).trim();
    if key.is_empty() {
        return (context, None);
    }

    let record = ReconstructedRecord {
        key: key.to_string(),
        fields: row.clone(),
        parent: context.clone(),
    };
    (context, Some(record))
}

/// Scan every row in order.
pub fn reconstruct(rows: &[SourceRecord]) -> Reconstruction {
    let (_, reconstruction) = rows.iter().fold(
        (ParentContext::default(), Reconstruction::default()),
        |(context, mut acc), row| {
            let (context, record) = step(context, row);
            match record {
                Some(record) => acc.records.push(record),
                None => acc.dropped += 1,
            }
            (context, acc)
        },
    );
    reconstruction
}

/// Group records into families by the parent title captured at emission.
///
/// Handles are not used: unrelated products may share one in the export.
/// Families keep first-seen order, members keep source order.
pub fn group_families(records: Vec<ReconstructedRecord>) -> Vec<ProductFamily> {
    let mut families: IndexMap<String, Vec<ReconstructedRecord>> = IndexMap::new();

    for record in records {
        families
            .entry(record.parent.title.clone())
            .or_default()
            .push(record);
    }

    families
        .into_iter()
        .map(|(title, members)| ProductFamily { title, members })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> SourceRecord {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn export() -> Vec<SourceRecord> {
        vec![
            row(&[
                ("Handle", "red"),
                ("Title", "Red Paint"),
                ("Body (HTML)", "<p>Red</p>"),
                ("Variant SKU", "RP-Q1"),
            ]),
            row(&[("Handle", "red"), ("Title", ""), ("Variant SKU", " RP-G1 ")]),
            row(&[("Handle", "red"), ("Title", ""), ("Variant SKU", "")]),
            row(&[("Handle", "blue"), ("Title", "Blue Metallic"), ("Variant SKU", "BM-Q1")]),
            row(&[("Handle", "blue"), ("Title", ""), ("Variant SKU", "BM-G1")]),
        ]
    }

    #[test]
    fn test_variant_inherits_parent_fields() {
        let result = reconstruct(&export());

        let gallon = &result.records[1];
        assert_eq!(gallon.key, "RP-G1");
        assert_eq!(gallon.parent.title, "Red Paint");
        assert_eq!(gallon.parent.body_html, "<p>Red</p>");
        assert_eq!(gallon.parent.handle, "red");
        // Own fields stay separate from inherited ones.
        assert_eq!(gallon.field("Title"), "");
    }

    #[test]
    fn test_rows_without_key_dropped() {
        let result = reconstruct(&export());

        assert_eq!(result.records.len(), 4);
        assert_eq!(result.dropped, 1);
        assert!(result.records.iter().all(|r| !r.key.is_empty()));
    }

    #[test]
    fn test_context_never_comes_from_a_later_row() {
        let rows = vec![
            row(&[("Title", ""), ("Variant SKU", "ORPHAN")]),
            row(&[("Title", "Later Parent"), ("Variant SKU", "LP-1")]),
        ];
        let result = reconstruct(&rows);

        assert_eq!(result.records[0].parent, ParentContext::default());
        assert_eq!(result.records[1].parent.title, "Later Parent");
    }

    #[test]
    fn test_title_row_without_key_still_sets_context() {
        let rows = vec![
            row(&[("Title", "Parent Only"), ("Handle", "p"), ("Variant SKU", "")]),
            row(&[("Title", ""), ("Variant SKU", "V-1")]),
        ];
        let result = reconstruct(&rows);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].parent.title, "Parent Only");
    }

    #[test]
    fn test_step_is_pure() {
        let parent = row(&[("Title", "Red Paint"), ("Variant SKU", "RP-Q1")]);
        let (first, _) = step(ParentContext::default(), &parent);
        let (second, _) = step(ParentContext::default(), &parent);
        assert_eq!(first, second);
    }

    #[test]
    fn test_families_by_title_in_first_seen_order() {
        let families = group_families(reconstruct(&export()).records);

        assert_eq!(families.len(), 2);
        assert_eq!(families[0].title, "Red Paint");
        assert_eq!(families[1].title, "Blue Metallic");
        let keys: Vec<_> = families[1].members.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["BM-Q1", "BM-G1"]);
    }

    #[test]
    fn test_shared_handle_different_title_splits_family() {
        let rows = vec![
            row(&[("Handle", "dup"), ("Title", "First"), ("Variant SKU", "A")]),
            row(&[("Handle", "dup"), ("Title", "Second"), ("Variant SKU", "B")]),
        ];
        let families = group_families(reconstruct(&rows).records);

        assert_eq!(families.len(), 2);
    }
}
