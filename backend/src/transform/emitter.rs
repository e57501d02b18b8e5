//! Column emission: one output value per schema position.
//!
//! Templates declare some column names several times (five `Bullet Point`
//! columns, five `Dangerous Goods Regulations`, two `GHS Class`). A name-keyed
//! record cannot tell those apart, so positions are resolved from
//! `(name, occurrence)` pairs re-derived from the schema order.

use super::bullets::BULLET_BUDGET;
use super::policy::ColumnLayout;
use crate::markup::truncate_chars;
use crate::models::{BulletSequence, TargetRecord, TargetSchema};

/// Values in schema order. Always exactly `schema.len()` long.
pub fn emit(
    schema: &TargetSchema,
    record: &TargetRecord,
    bullets: &BulletSequence,
    layout: &ColumnLayout,
) -> Vec<String> {
    schema
        .positions()
        .into_iter()
        .map(|position| {
            if position.name == layout.bullet_column {
                let bullet = bullets.get(position.occurrence).unwrap_or("");
                return truncate_chars(bullet, BULLET_BUDGET).to_string();
            }
            match layout.group(position.name) {
                Some(group) => group
                    .values
                    .get(position.occurrence)
                    .cloned()
                    .unwrap_or_default(),
                None => record.get(position.name).to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::policy::MappingPolicy;

    fn schema(names: &[&str]) -> TargetSchema {
        TargetSchema::new(names.iter().map(|s| s.to_string()).collect())
    }

    fn bullets() -> BulletSequence {
        BulletSequence::from_items(vec!["b0".into(), "b1".into()], "")
    }

    #[test]
    fn test_bullets_by_occurrence() {
        let schema = schema(&["SKU", "Bullet Point", "Color", "Bullet Point", "Bullet Point"]);
        let mut record = TargetRecord::for_schema(&schema);
        record.set("SKU", "RP-Q1");
        record.set("Bullet Point", "never used");

        let row = emit(&schema, &record, &bullets(), &MappingPolicy::paint().layout);
        assert_eq!(row, vec!["RP-Q1", "b0", "", "b1", ""]);
    }

    #[test]
    fn test_bullets_beyond_five_empty() {
        let names = vec!["Bullet Point"; 7];
        let schema = schema(&names);
        let full = BulletSequence::from_items((0..5).map(|i| i.to_string()).collect(), " ");

        let row = emit(&schema, &TargetRecord::default(), &full, &MappingPolicy::paint().layout);
        assert_eq!(row, vec!["0", "1", "2", "3", "4", "", ""]);
    }

    #[test]
    fn test_repeated_groups_depend_on_position_only() {
        let schema = schema(&[
            "Dangerous Goods Regulations",
            "GHS Class",
            "Dangerous Goods Regulations",
            "GHS Class",
            "GHS Class",
        ]);
        let layout = MappingPolicy::paint().layout;
        let mut record = TargetRecord::for_schema(&schema);
        record.set("GHS Class", "ignored");

        let row = emit(&schema, &record, &bullets(), &layout);
        assert_eq!(
            row,
            vec!["Other", "Amazon Specific No Label With Warning", "GHS", "Irritant", ""]
        );
        let empty = emit(&schema, &TargetRecord::default(), &bullets(), &layout);
        assert_eq!(row, empty);
    }

    #[test]
    fn test_groups_absent_from_layout_read_record() {
        let schema = schema(&["GHS Class", "GHS Class"]);
        let mut record = TargetRecord::for_schema(&schema);
        record.set("GHS Class", "Flammable");

        let row = emit(&schema, &record, &bullets(), &MappingPolicy::paint_variations().layout);
        assert_eq!(row, vec!["Flammable", "Flammable"]);
    }

    #[test]
    fn test_length_matches_schema() {
        let layout = MappingPolicy::factory_pack().layout;
        for names in [vec![], vec!["SKU"], vec!["A", "A", "Bullet Point", "Unknown"]] {
            let schema = schema(&names);
            let row = emit(&schema, &TargetRecord::default(), &bullets(), &layout);
            assert_eq!(row.len(), schema.len());
            assert!(row.iter().all(|v| v.is_empty() || v.starts_with('b')));
        }
    }
}
