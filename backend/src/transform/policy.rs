//! Product-line mapping policies.
//!
//! A [`MappingPolicy`] is the rule table the field mapper, bullet generator
//! and column emitter consult. Product lines differ only in data (default
//! finish, size labels, bullet source, repeated column tables), so each known
//! line is a constructor here and any of them can be replaced by a JSON file.
//!
//! ```text
//! preset        mode          policy
//! flat          standalone    paint (browse-path keyword, DG/GHS tables)
//! variations    hierarchical  paint (short keyword, bullets only)
//! factory-pack  hierarchical  factory_pack
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::models::columns::target;

/// Long browse path used by the flat listing keyword.
pub const BROWSE_PATH_KEYWORD: &str =
    "Automotive > Paint & Paint Supplies > Paints & Primers > Clear Coats (automotive-clear-coat-paints)";

/// Short keyword used by variation listings.
pub const SHORT_KEYWORD: &str = "automotive-paints";

// =============================================================================
// Mode and presets
// =============================================================================

/// How source rows become output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One output row per variant.
    Standalone,
    /// One synthetic parent row per family, followed by its children.
    Hierarchical,
}

/// Named `(Mode, MappingPolicy)` pairs selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Flat,
    Variations,
    FactoryPack,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Flat, Preset::Variations, Preset::FactoryPack];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Flat => "flat",
            Preset::Variations => "variations",
            Preset::FactoryPack => "factory-pack",
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Preset::Flat => Mode::Standalone,
            Preset::Variations | Preset::FactoryPack => Mode::Hierarchical,
        }
    }

    pub fn policy(&self) -> MappingPolicy {
        match self {
            Preset::Flat => MappingPolicy::paint(),
            Preset::Variations => MappingPolicy::paint_variations(),
            Preset::FactoryPack => MappingPolicy::factory_pack(),
        }
    }

    /// Whether the template's example row is written before data rows.
    pub fn include_example_row(&self) -> bool {
        matches!(self, Preset::Flat)
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "flat" | "standalone" => Ok(Preset::Flat),
            "variations" | "paint-variations" => Ok(Preset::Variations),
            "factory-pack" | "factory-packs" => Ok(Preset::FactoryPack),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

// =============================================================================
// Policy table
// =============================================================================

/// Product-line rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingPolicy {
    pub name: String,

    /// Literal values applied right after the empty-string initialization.
    #[serde(default)]
    pub defaults: IndexMap<String, String>,

    pub item_type_keyword: String,

    pub color: ColorRule,

    pub default_paint_type: String,

    pub default_finish: String,

    pub sizes: SizeRules,

    pub description: DescriptionSource,

    pub bullets: BulletStrategy,

    /// Filler for unused bullet slots. A single space forces the marketplace
    /// to overwrite a previous value; empty leaves it untouched.
    #[serde(default)]
    pub bullet_padding: String,

    pub offer: OfferRule,

    pub variation_theme: String,

    pub parent_key: ParentKeyRule,

    /// Reset to empty on synthetic parent rows.
    #[serde(default)]
    pub child_only_fields: Vec<String>,

    pub layout: ColumnLayout,
}

/// Where colour values come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    pub source: ColorSource,
    pub fallback_color: String,
    pub fallback_color_code: String,
    /// Look for a paint code in the title when the metafield is empty.
    #[serde(default)]
    pub infer_from_title: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSource {
    /// The variant's colour-pattern metafield fills both colour columns.
    ColorPattern,
    /// The family colour code fills both colour columns.
    ColorCode,
}

/// Size and volume inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRules {
    /// Also search the title, not only the option value.
    #[serde(default)]
    pub scan_title: bool,
    /// Checked in order; first match wins.
    pub rules: Vec<SizeRule>,
    /// Unit count written when no rule matches.
    #[serde(default)]
    pub unmatched: Option<UnitCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRule {
    pub needle: String,
    pub label: String,
    pub volume: String,
    pub volume_unit: String,
    #[serde(default)]
    pub unit_count: Option<UnitCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCount {
    pub count: String,
    pub unit: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DescriptionSource {
    /// Stripped description markup of the record.
    Markup,
    /// The run's fixed product-line description.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BulletStrategy {
    /// `<li>` items, else the description prefix.
    Markup,
    /// Fixed lines with `{color_code}` and related-product placeholders.
    Template {
        color_code_line: String,
        fallback_line: String,
        lines: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRule {
    pub quantity: QuantitySource,
    /// Copy the list price into the selling price column.
    #[serde(default)]
    pub mirror_price: bool,
    #[serde(default)]
    pub handling_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuantitySource {
    /// The export's inventory quantity.
    Inventory,
    /// Same stock figure on every listing.
    Fixed { value: String },
}

/// Synthetic parent SKU construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentKeyRule {
    pub prefix: String,
    /// Removed from the handle, in order.
    pub handle_noise: Vec<String>,
    /// Characters kept from the cleaned handle.
    pub handle_budget: usize,
}

/// Repeated-column resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub bullet_column: String,
    #[serde(default)]
    pub repeated: Vec<RepeatedGroup>,
}

/// A column name declared several times with a fixed value per occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatedGroup {
    pub name: String,
    pub values: Vec<String>,
}

impl ColumnLayout {
    pub fn group(&self, name: &str) -> Option<&RepeatedGroup> {
        self.repeated.iter().find(|g| g.name == name)
    }

    fn hazmat() -> Self {
        Self {
            bullet_column: target::BULLET_POINT.to_string(),
            repeated: vec![
                RepeatedGroup {
                    name: target::DANGEROUS_GOODS.to_string(),
                    values: strings(&["Other", "GHS", "GHS", "GHS", "GHS"]),
                },
                RepeatedGroup {
                    name: target::GHS_CLASS.to_string(),
                    values: strings(&["Amazon Specific No Label With Warning", "Irritant"]),
                },
            ],
        }
    }

    fn bullets_only() -> Self {
        Self {
            bullet_column: target::BULLET_POINT.to_string(),
            repeated: Vec::new(),
        }
    }
}

impl MappingPolicy {
    /// Aerosol paint line, one listing per variant.
    pub fn paint() -> Self {
        Self {
            name: "paint".to_string(),
            defaults: table(&[
                ("Number of attributes with errors", "0"),
                ("Number of attributes with other suggestions", "0"),
                ("Listing Action", "Create or Replace (Full Update)"),
                ("Product Type", "PAINT"),
                ("Item Condition", "New"),
                ("Fulfillment Channel Code (US)", "DEFAULT"),
                ("Merchant Shipping Group (US)", "Migrated Template"),
                ("Number of Items", "1"),
                ("Surface Recommendation", "Metal"),
                ("Coverage", "0"),
                ("Item Form", "Aerosol"),
                (target::UNIT_COUNT, "1"),
                (target::UNIT_COUNT_TYPE, "Fl Oz"),
                ("Specific Uses for Product", "Exterior"),
            ]),
            item_type_keyword: BROWSE_PATH_KEYWORD.to_string(),
            color: ColorRule {
                source: ColorSource::ColorPattern,
                fallback_color: "Clear".to_string(),
                fallback_color_code: "Clear".to_string(),
                infer_from_title: false,
            },
            default_paint_type: "Spray".to_string(),
            default_finish: "Metallic".to_string(),
            sizes: SizeRules {
                scan_title: true,
                rules: vec![
                    size_rule("gallon", "Gallon", "Gallons", None),
                    size_rule("quart", "Quart", "Quarts", None),
                    size_rule("pint", "Pint", "Pints", None),
                ],
                unmatched: None,
            },
            description: DescriptionSource::Markup,
            bullets: BulletStrategy::Markup,
            bullet_padding: String::new(),
            offer: OfferRule {
                quantity: QuantitySource::Inventory,
                mirror_price: false,
                handling_time: None,
            },
            variation_theme: "COLOR/SIZE".to_string(),
            parent_key: ParentKeyRule::spectral(),
            child_only_fields: child_only_fields(),
            layout: ColumnLayout::hazmat(),
        }
    }

    /// Paint line listed as parent/child variations.
    pub fn paint_variations() -> Self {
        Self {
            name: "paint-variations".to_string(),
            item_type_keyword: SHORT_KEYWORD.to_string(),
            layout: ColumnLayout::bullets_only(),
            ..Self::paint()
        }
    }

    /// Factory-pack urethane base coat, listed as colour/size variations.
    pub fn factory_pack() -> Self {
        Self {
            name: "factory-pack".to_string(),
            defaults: table(&[
                ("Listing Action", "Create or Replace (Full Update)"),
                ("Product Type", "PAINT"),
                ("Item Condition", "New"),
                ("Fulfillment Channel Code (US)", "DEFAULT"),
                ("Merchant Shipping Group (US)", "Migrated Template"),
                ("Number of Items", "1"),
                ("Surface Recommendation", "Metal"),
                ("Coverage", "150-200 Square Feet"),
                ("Item Form", "Liquid"),
                ("Specific Uses for Product", "Exterior"),
            ]),
            item_type_keyword: SHORT_KEYWORD.to_string(),
            color: ColorRule {
                source: ColorSource::ColorCode,
                fallback_color: "Custom".to_string(),
                fallback_color_code: String::new(),
                infer_from_title: true,
            },
            default_paint_type: "Urethane".to_string(),
            default_finish: "Metallic".to_string(),
            sizes: SizeRules {
                scan_title: false,
                rules: vec![
                    size_rule("gallon", "1 Gallon", "Gallons", Some("128")),
                    size_rule("quart", "1 Quart", "Quarts", Some("32")),
                    size_rule("pint", "1 Pint", "Pints", Some("16")),
                ],
                unmatched: Some(UnitCount {
                    count: "1".to_string(),
                    unit: "Count".to_string(),
                }),
            },
            description: DescriptionSource::Fixed,
            bullets: BulletStrategy::Template {
                color_code_line: "Color Code: {color_code}".to_string(),
                fallback_line: "1K urethane base coat paint. Easy to spray.".to_string(),
                lines: strings(&[
                    "Finishing with clear coat is required. We recommend our 2K 4:1 Clear Coat Kit for professional results.",
                    "Surface must be primed or previously painted and sufficiently prepped before applying basecoat. Use Adhesion Promoter on raw plastic.",
                    "Product comes UNREDUCED. Mix 1:1 with Urethane Reducer for approximately 2 quarts of sprayable product (150-200 sq ft coverage).",
                    "Spectral Paints is a Registered Brand of Spectral Paints LLC. All products are final sale - please verify color match before starting.",
                ]),
            },
            bullet_padding: " ".to_string(),
            offer: OfferRule {
                quantity: QuantitySource::Fixed { value: "30".to_string() },
                mirror_price: true,
                handling_time: Some("2".to_string()),
            },
            variation_theme: "COLOR/SIZE".to_string(),
            parent_key: ParentKeyRule::spectral(),
            child_only_fields: child_only_fields(),
            layout: ColumnLayout::hazmat(),
        }
    }

    /// Load a policy from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ParentKeyRule {
    fn spectral() -> Self {
        Self {
            prefix: "SP-PARENT-".to_string(),
            handle_noise: strings(&["for-", "-gallon-paint", "-paint"]),
            handle_budget: 25,
        }
    }
}

/// Offer, size and per-variant material columns a parent listing leaves blank.
fn child_only_fields() -> Vec<String> {
    strings(&[
        "Item Condition",
        target::LIST_PRICE,
        target::YOUR_PRICE,
        "Fulfillment Channel Code (US)",
        target::QUANTITY,
        target::HANDLING_TIME,
        "Merchant Shipping Group (US)",
        "Number of Items",
        target::PART_NUMBER,
        target::PAINT_TYPE,
        target::FINISH_TYPE,
        "Item Form",
        "Specific Uses for Product",
        target::SIZE,
        target::ITEM_VOLUME,
        target::ITEM_VOLUME_UNIT,
        target::UNIT_COUNT,
        target::UNIT_COUNT_TYPE,
    ])
}

fn size_rule(needle: &str, label: &str, volume_unit: &str, fl_oz: Option<&str>) -> SizeRule {
    SizeRule {
        needle: needle.to_string(),
        label: label.to_string(),
        volume: "1".to_string(),
        volume_unit: volume_unit.to_string(),
        unit_count: fl_oz.map(|count| UnitCount {
            count: count.to_string(),
            unit: "Fl Oz".to_string(),
        }),
    }
}

fn table(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
