//! Bullet point generation.

use super::mapper::color_code;
use super::policy::{BulletStrategy, MappingPolicy};
use crate::config::AuxiliaryTemplates;
use crate::markup::{extract_list_items, strip, truncate_chars};
use crate::models::{BulletSequence, ReconstructedRecord, BULLET_SLOTS};

/// Character budget of a single bullet.
pub const BULLET_BUDGET: usize = 500;

/// Five bullets for `record` under the policy's strategy.
pub fn generate(
    record: &ReconstructedRecord,
    policy: &MappingPolicy,
    templates: &AuxiliaryTemplates,
) -> BulletSequence {
    let items = match &policy.bullets {
        BulletStrategy::Markup => from_markup(record.body_html()),
        BulletStrategy::Template { color_code_line, fallback_line, lines } => {
            let code = color_code(record, policy);
            let first = if code.is_empty() {
                fallback_line.clone()
            } else {
                color_code_line.replace("{color_code}", &code)
            };
            std::iter::once(first)
                .chain(lines.iter().map(|line| fill_related(line, templates)))
                .collect()
        }
    };

    let items = items
        .into_iter()
        .map(|item| truncate_chars(&item, BULLET_BUDGET).to_string())
        .collect();
    BulletSequence::from_items(items, &policy.bullet_padding)
}

/// List items, else one bullet cut from the stripped description.
fn from_markup(markup: &str) -> Vec<String> {
    let items = extract_list_items(markup, BULLET_SLOTS);
    if !items.is_empty() {
        return items;
    }
    let text = strip(markup);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}

/// Replace `{name}` with the related product identifier of that name.
fn fill_related(line: &str, templates: &AuxiliaryTemplates) -> String {
    templates
        .related_products
        .iter()
        .fold(line.to_string(), |line, (name, id)| line.replace(&format!("{{{}}}", name), id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParentContext, SourceRecord};

    fn record(pairs: &[(&str, &str)]) -> ReconstructedRecord {
        let fields: SourceRecord = pairs.iter().map(|(k, v)| (*k, *v)).collect();
        ReconstructedRecord {
            key: "K".to_string(),
            parent: ParentContext::from_row(&fields),
            fields,
        }
    }

    #[test]
    fn test_list_items_become_bullets() {
        let rec = record(&[
            ("Title", "Red"),
            ("Body (HTML)", "<ul><li>Fast</li><li></li><li>Durable &amp; bright</li></ul>"),
        ]);
        let bullets = generate(&rec, &MappingPolicy::paint(), &AuxiliaryTemplates::default());

        assert_eq!(
            bullets.iter().collect::<Vec<_>>(),
            vec!["Fast", "Durable & bright", "", "", ""]
        );
    }

    #[test]
    fn test_description_prefix_without_list_items() {
        let body = format!("<p>{}</p>", "a".repeat(600));
        let rec = record(&[("Title", "Red"), ("Body (HTML)", body.as_str())]);
        let bullets = generate(&rec, &MappingPolicy::paint(), &AuxiliaryTemplates::default());

        assert_eq!(bullets.get(0), Some("a".repeat(500).as_str()));
        for slot in 1..5 {
            assert_eq!(bullets.get(slot), Some(""));
        }
    }

    #[test]
    fn test_empty_markup_all_padding() {
        let rec = record(&[("Title", "Red")]);
        let bullets = generate(&rec, &MappingPolicy::paint(), &AuxiliaryTemplates::default());
        assert!(bullets.iter().all(str::is_empty));
    }

    #[test]
    fn test_template_bullets_with_color_code() {
        let rec = record(&[
            ("Title", "Toyota Super White"),
            ("Body (HTML)", "<ul><li>ignored</li></ul>"),
            ("color code (product.metafields.custom.color_code)", "040"),
        ]);
        let templates = AuxiliaryTemplates::from_env();
        let bullets = generate(&rec, &MappingPolicy::factory_pack(), &templates);

        assert_eq!(bullets.get(0), Some("Color Code: 040"));
        assert!(bullets.get(1).unwrap().starts_with("Finishing with clear coat"));
        assert!(bullets.get(4).unwrap().contains("final sale"));
    }

    #[test]
    fn test_template_fallback_line_without_code() {
        let rec = record(&[("Title", "Custom Mix")]);
        let templates = AuxiliaryTemplates::default();
        let bullets = generate(&rec, &MappingPolicy::factory_pack(), &templates);
        assert_eq!(bullets.get(0), Some("1K urethane base coat paint. Easy to spray."));
    }

    #[test]
    fn test_template_padding_and_related_placeholder() {
        let mut policy = MappingPolicy::factory_pack();
        policy.bullets = BulletStrategy::Template {
            color_code_line: "Code {color_code}".to_string(),
            fallback_line: "No code".to_string(),
            lines: vec!["Pair with {clear_coat_kit}".to_string()],
        };
        let mut templates = AuxiliaryTemplates::default();
        templates
            .related_products
            .insert("clear_coat_kit".to_string(), "B000TEST".to_string());

        let bullets = generate(&record(&[("Title", "Plain")]), &policy, &templates);
        assert_eq!(
            bullets.iter().collect::<Vec<_>>(),
            vec!["No code", "Pair with B000TEST", " ", " ", " "]
        );
    }

    #[test]
    fn test_bullets_never_exceed_budget() {
        let body = format!("<li>{}</li>", "é".repeat(800));
        let rec = record(&[("Title", "Red"), ("Body (HTML)", body.as_str())]);
        let bullets = generate(&rec, &MappingPolicy::paint(), &AuxiliaryTemplates::default());
        assert!(bullets.iter().all(|b| b.chars().count() <= BULLET_BUDGET));
        assert_eq!(bullets.get(0).unwrap().chars().count(), BULLET_BUDGET);
    }
}
