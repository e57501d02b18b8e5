//! Field mapping: one reconstructed record to one target record.
//!
//! Rules run in a fixed precedence; later rules may overwrite earlier
//! defaults. Every rule is total: a missing source column reads as an empty
//! string and never fails the row.
//!
//! 1. every schema name set to `""`, then the policy default table
//! 2. identity (SKU, part number)
//! 3. display name
//! 4. identifier type / identifier pair
//! 5. colour, finish, paint type, item type keyword
//! 6. size and volume inference
//! 7. variation linkage
//! 8. description, offer fields, image
//! 9. seller constants
//! 10. child-only fields cleared on parent rows

use once_cell::sync::Lazy;
use regex::Regex;

use super::policy::{
    ColorSource, DescriptionSource, MappingPolicy, QuantitySource, SizeRule, SizeRules,
};
use crate::config::{AuxiliaryTemplates, SellerProfile};
use crate::markup::{strip, truncate_chars};
use crate::models::columns::{source, target};
use crate::models::{ReconstructedRecord, Role, TargetRecord, TargetSchema};

/// Character budget of the display name.
pub const NAME_BUDGET: usize = 500;

/// Character budget of the description.
pub const DESCRIPTION_BUDGET: usize = 2000;

pub const UPC_ID_TYPE: &str = "UPC";
pub const EXEMPT_ID_TYPE: &str = "GTIN Exempt";

/// Paint code shapes found in titles, most specific first.
static COLOR_CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(WA\d+)\b",
        r"(?i)\b([A-Z]{2}\d+)\b",
        r"(?i)\b(\d{3})\b",
        r"(?i)\b(\d[A-Z]\d)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid color code pattern"))
    .collect()
});

/// Maps records under one policy for one schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper<'a> {
    pub schema: &'a TargetSchema,
    pub policy: &'a MappingPolicy,
    pub templates: &'a AuxiliaryTemplates,
    pub seller: &'a SellerProfile,
}

impl<'a> FieldMapper<'a> {
    pub fn new(
        schema: &'a TargetSchema,
        policy: &'a MappingPolicy,
        templates: &'a AuxiliaryTemplates,
        seller: &'a SellerProfile,
    ) -> Self {
        Self { schema, policy, templates, seller }
    }

    /// Build the target record of `record` in `role`.
    pub fn map(&self, record: &ReconstructedRecord, role: &Role) -> TargetRecord {
        let policy = self.policy;
        let mut out = TargetRecord::for_schema(self.schema);
        for (name, value) in &policy.defaults {
            out.set(name, value.as_str());
        }

        // Identity
        let sku = match role {
            Role::Parent { key } => key.as_str(),
            Role::Standalone | Role::Child { .. } => record.key.as_str(),
        };
        out.set(target::SKU, sku);
        out.set(target::PART_NUMBER, record.key.as_str());

        // Display name
        let title = record.title();
        let name = match role {
            Role::Parent { .. } => title.to_string(),
            Role::Standalone | Role::Child { .. } => display_name(title, record.option_value()),
        };
        out.set(target::ITEM_NAME, truncate_chars(&name, NAME_BUDGET));

        // Identifier pair
        let upc = match role {
            Role::Parent { .. } => "",
            Role::Standalone | Role::Child { .. } => record.field(source::UPC).trim(),
        };
        let (id_type, id) = identifier_pair(upc);
        out.set(target::PRODUCT_ID_TYPE, id_type);
        out.set(target::PRODUCT_ID, id);

        // Category and material
        out.set(target::ITEM_TYPE_KEYWORD, policy.item_type_keyword.as_str());
        let (color, color_code) = self.colors(record);
        out.set(target::COLOR, color);
        out.set(target::COLOR_CODE, color_code);
        out.set(
            target::PAINT_TYPE,
            or_default(record.field(source::VEHICLE_PAINT_TYPE), &policy.default_paint_type),
        );
        out.set(
            target::FINISH_TYPE,
            or_default(record.field(source::PAINT_FINISH), &policy.default_finish),
        );

        // Size and volume
        let scanned_title = if policy.sizes.scan_title { title } else { "" };
        match infer_size(record.option_value(), scanned_title, &policy.sizes) {
            Some(rule) => {
                out.set(target::SIZE, rule.label.as_str());
                out.set(target::ITEM_VOLUME, rule.volume.as_str());
                out.set(target::ITEM_VOLUME_UNIT, rule.volume_unit.as_str());
                if let Some(units) = &rule.unit_count {
                    out.set(target::UNIT_COUNT, units.count.as_str());
                    out.set(target::UNIT_COUNT_TYPE, units.unit.as_str());
                }
            }
            None => {
                if let Some(units) = &policy.sizes.unmatched {
                    out.set(target::UNIT_COUNT, units.count.as_str());
                    out.set(target::UNIT_COUNT_TYPE, units.unit.as_str());
                }
            }
        }

        // Variation linkage
        if let Some(level) = role.parentage_label() {
            out.set(target::PARENTAGE_LEVEL, level);
            let parent_sku = match role {
                Role::Child { parent_key } => parent_key.as_str(),
                _ => "",
            };
            out.set(target::PARENT_SKU, parent_sku);
            out.set(target::VARIATION_THEME, policy.variation_theme.as_str());
        }

        // Text, offer, image
        let description = self.description(record);
        out.set(
            target::PRODUCT_DESCRIPTION,
            truncate_chars(&description, DESCRIPTION_BUDGET),
        );

        let price = record.field(source::VARIANT_PRICE);
        out.set(target::LIST_PRICE, price);
        if policy.offer.mirror_price {
            out.set(target::YOUR_PRICE, price);
        }
        let quantity = match &policy.offer.quantity {
            QuantitySource::Inventory => record.field(source::VARIANT_INVENTORY_QTY),
            QuantitySource::Fixed { value } => value.as_str(),
        };
        out.set(target::QUANTITY, quantity);
        if let Some(days) = &policy.offer.handling_time {
            out.set(target::HANDLING_TIME, days.as_str());
        }
        out.set(target::MAIN_IMAGE_URL, record.image());

        // Seller constants
        let seller = self.seller;
        out.set(target::BRAND_NAME, seller.brand.as_str());
        out.set(target::MANUFACTURER, seller.manufacturer.as_str());
        out.set(target::COUNTRY_OF_ORIGIN, seller.country_of_origin.as_str());
        out.set(target::BATTERIES_REQUIRED, seller.batteries_required.as_str());
        out.set(target::BATTERIES_INCLUDED, seller.batteries_included.as_str());
        out.set(target::SDS_URL, seller.sds_url.as_str());

        if let Role::Parent { .. } = role {
            for name in &policy.child_only_fields {
                out.clear(name);
            }
        }

        out
    }

    /// Plain description before truncation.
    pub fn description(&self, record: &ReconstructedRecord) -> String {
        match self.policy.description {
            DescriptionSource::Markup => strip(record.body_html()),
            DescriptionSource::Fixed => self.templates.description.clone(),
        }
    }

    fn colors(&self, record: &ReconstructedRecord) -> (String, String) {
        let rule = &self.policy.color;
        let value = match rule.source {
            ColorSource::ColorPattern => record.field(source::COLOR_PATTERN).trim().to_string(),
            ColorSource::ColorCode => color_code(record, self.policy),
        };
        if value.is_empty() {
            (rule.fallback_color.clone(), rule.fallback_color_code.clone())
        } else {
            (value.clone(), value)
        }
    }
}

/// Title plus ` - option`, unless the option is already part of the title.
///
/// # Example
/// ```
/// use flatfile::transform::mapper::display_name;
///
/// assert_eq!(display_name("Red Paint", "Quart"), "Red Paint - Quart");
/// assert_eq!(display_name("Red Paint", "red"), "Red Paint");
/// ```
pub fn display_name(title: &str, option: &str) -> String {
    let option = option.trim();
    if option.is_empty() || title.to_lowercase().contains(&option.to_lowercase()) {
        title.to_string()
    } else {
        format!("{} - {}", title, option)
    }
}

/// Identifier type and value, always set together.
pub fn identifier_pair(upc: &str) -> (&'static str, &str) {
    if upc.is_empty() {
        (EXEMPT_ID_TYPE, "")
    } else {
        (UPC_ID_TYPE, upc)
    }
}

/// First size rule whose needle appears in the option value or title.
///
/// Matching ignores case on both sides.
pub fn infer_size<'p>(option: &str, title: &str, sizes: &'p SizeRules) -> Option<&'p SizeRule> {
    let option = option.to_lowercase();
    let title = title.to_lowercase();
    sizes.rules.iter().find(|rule| {
        let needle = rule.needle.to_lowercase();
        option.contains(&needle) || title.contains(&needle)
    })
}

/// Family colour code: the metafield, else (when allowed) a code found in the title.
pub fn color_code(record: &ReconstructedRecord, policy: &MappingPolicy) -> String {
    let declared = record.parent.color_code.trim();
    if !declared.is_empty() {
        return declared.to_string();
    }
    if policy.color.infer_from_title {
        infer_color_code(record.title())
    } else {
        String::new()
    }
}

/// Paint code embedded in a title, uppercased, or empty.
pub fn infer_color_code(title: &str) -> String {
    COLOR_CODE_PATTERNS
        .iter()
        .find_map(|re| re.captures(title).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_default()
}

/// Synthetic SKU for a family parent.
///
/// Prefers the colour code (uppercased, spaces and slashes removed), else
/// the handle with noise removed, clipped and de-hyphenated.
pub fn parent_key(record: &ReconstructedRecord, policy: &MappingPolicy) -> String {
    let rule = &policy.parent_key;
    let code = color_code(record, policy);
    if !code.is_empty() {
        let normalized: String = code
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();
        return format!("{}{}", rule.prefix, normalized);
    }

    let cleaned = rule
        .handle_noise
        .iter()
        .fold(record.parent.handle.clone(), |handle, noise| handle.replace(noise.as_str(), ""));
    let clipped = truncate_chars(&cleaned, rule.handle_budget).to_uppercase().replace('-', "");
    format!("{}{}", rule.prefix, clipped)
}

fn or_default<'v>(value: &'v str, default: &'v str) -> &'v str {
    let value = value.trim();
    if value.is_empty() {
        default
    } else {
        value
    }
}
