//! Run configuration.
//!
//! Values come from the environment (a `.env` file is loaded by the CLI at
//! startup) and can be overridden by command-line flags.
//!
//! | Variable                     | Default                         |
//! |------------------------------|---------------------------------|
//! | `FLATFILE_TEMPLATE`          | `amazon_template_headers.json`  |
//! | `FLATFILE_DESCRIPTION`       | `factory_pack_description.txt`  |
//! | `FLATFILE_OUTPUT_ENCODING`   | `windows-1252`                  |
//! | `FLATFILE_BRAND`             | `Spectral Paints`               |
//! | `FLATFILE_MANUFACTURER`      | `Spectral Paints`               |
//! | `FLATFILE_COUNTRY_OF_ORIGIN` | `United States`                 |
//! | `FLATFILE_SDS_URL`           | `spectralpaints.biz`            |
//! | `FLATFILE_CLEAR_COAT_KIT`    | `B0GCGHRP86`                    |

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ConfigResult;
use crate::logs::{log_success, log_warning};
use crate::markup::normalize_whitespace;
use crate::parser::{decode_content, detect_encoding};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub const DEFAULT_TEMPLATE_PATH: &str = "amazon_template_headers.json";
pub const DEFAULT_DESCRIPTION_PATH: &str = "factory_pack_description.txt";
pub const DEFAULT_OUTPUT_ENCODING: &str = "windows-1252";

/// Facts about the selling entity, identical on every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub brand: String,
    pub manufacturer: String,
    pub country_of_origin: String,
    pub sds_url: String,
    pub batteries_required: String,
    pub batteries_included: String,
}

impl Default for SellerProfile {
    fn default() -> Self {
        Self {
            brand: "Spectral Paints".to_string(),
            manufacturer: "Spectral Paints".to_string(),
            country_of_origin: "United States".to_string(),
            sds_url: "spectralpaints.biz".to_string(),
            batteries_required: "No".to_string(),
            batteries_included: "No".to_string(),
        }
    }
}

impl SellerProfile {
    /// Defaults overridden by `FLATFILE_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            brand: env_or("FLATFILE_BRAND", defaults.brand),
            manufacturer: env_or("FLATFILE_MANUFACTURER", defaults.manufacturer),
            country_of_origin: env_or("FLATFILE_COUNTRY_OF_ORIGIN", defaults.country_of_origin),
            sds_url: env_or("FLATFILE_SDS_URL", defaults.sds_url),
            ..defaults
        }
    }
}

/// Product-line text and cross-reference identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryTemplates {
    /// Fixed description used by policies that ignore the export's markup.
    pub description: String,
    /// Related listing identifiers, usable as `{name}` in bullet templates.
    pub related_products: IndexMap<String, String>,
}

impl AuxiliaryTemplates {
    /// Related products from the environment, no description.
    pub fn from_env() -> Self {
        let mut related_products = IndexMap::new();
        related_products.insert(
            "clear_coat_kit".to_string(),
            env_or("FLATFILE_CLEAR_COAT_KIT", "B0GCGHRP86".to_string()),
        );
        Self {
            description: String::new(),
            related_products,
        }
    }

    /// Read the fixed description, whitespace-normalized.
    ///
    /// A missing file is not fatal: the description stays empty. Other read
    /// failures are. Non-UTF-8 files are decoded like exports.
    pub fn with_description_file(mut self, path: &Path) -> ConfigResult<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log_warning(format!("No description found at {}", path.display()));
                return Ok(self);
            }
            Err(err) => return Err(err.into()),
        };

        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        let encoding = detect_encoding(bytes);
        self.description = normalize_whitespace(&decode_content(bytes, &encoding));
        log_success(format!(
            "Loaded description ({} chars, {})",
            self.description.chars().count(),
            encoding
        ));
        Ok(self)
    }
}

/// Paths and output settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub template_path: PathBuf,
    pub description_path: PathBuf,
    pub output_encoding: String,
    pub seller: SellerProfile,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            template_path: PathBuf::from(env_or(
                "FLATFILE_TEMPLATE",
                DEFAULT_TEMPLATE_PATH.to_string(),
            )),
            description_path: PathBuf::from(env_or(
                "FLATFILE_DESCRIPTION",
                DEFAULT_DESCRIPTION_PATH.to_string(),
            )),
            output_encoding: env_or(
                "FLATFILE_OUTPUT_ENCODING",
                DEFAULT_OUTPUT_ENCODING.to_string(),
            ),
            seller: SellerProfile::from_env(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}
