//! High-level conversion API.
//!
//! [`transform`] is the pure core: parsed export rows in, template-ordered
//! output rows out. [`convert_file`] wraps it with the reader, the template
//! loader and the writer.
//!
//! # Example
//!
//! ```rust,ignore
//! use flatfile::{convert_file, ConvertOptions, Preset, Settings};
//! use std::path::Path;
//!
//! let settings = Settings::from_env();
//! let options = ConvertOptions::from_preset(Preset::FactoryPack, &settings);
//! let report = convert_file(Path::new("products_export.csv"), Path::new("out.txt"), &options)?;
//! println!("{} rows written", report.stats.rows());
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::bullets;
use super::emitter::emit;
use super::hierarchy::{group_families, reconstruct};
use super::mapper::{parent_key, FieldMapper};
use super::policy::{DescriptionSource, MappingPolicy, Mode, Preset};
use crate::config::{AuxiliaryTemplates, SellerProfile, Settings};
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{ReconstructedRecord, Role, SourceRecord, TargetSchema};
use crate::parser::parse_file_auto;
use crate::template::TemplateHeaders;
use crate::writer::{write_flat_file, WriteOptions, WriteSummary};

/// Everything the core needs besides the rows and the schema.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub mode: Mode,
    pub policy: MappingPolicy,
    pub templates: AuxiliaryTemplates,
    pub seller: SellerProfile,
}

impl TransformOptions {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            mode: preset.mode(),
            policy: preset.policy(),
            templates: AuxiliaryTemplates::default(),
            seller: SellerProfile::default(),
        }
    }
}

/// Row counts of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub source_rows: usize,
    /// Source rows without a variant SKU.
    pub dropped: usize,
    pub families: usize,
    pub parents: usize,
    /// Variant rows written (children, or standalone rows).
    pub children: usize,
}

impl TransformStats {
    /// Data rows written.
    pub fn rows(&self) -> usize {
        self.parents + self.children
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub rows: Vec<Vec<String>>,
    pub stats: TransformStats,
}

/// Convert export rows to output rows in schema order.
///
/// In hierarchical mode a warning is logged when two families end up with the
/// same parent SKU (shared handle, different titles, no colour code).
pub fn transform(
    records: &[SourceRecord],
    schema: &TargetSchema,
    options: &TransformOptions,
) -> TransformOutput {
    let mapper = FieldMapper::new(schema, &options.policy, &options.templates, &options.seller);
    let reconstruction = reconstruct(records);
    let mut stats = TransformStats {
        source_rows: records.len(),
        dropped: reconstruction.dropped,
        ..Default::default()
    };

    let render = |record: &ReconstructedRecord, role: &Role| {
        let target = mapper.map(record, role);
        let bullets = bullets::generate(record, &options.policy, &options.templates);
        emit(schema, &target, &bullets, &options.policy.layout)
    };

    let mut rows = Vec::new();
    match options.mode {
        Mode::Standalone => {
            for record in &reconstruction.records {
                rows.push(render(record, &Role::Standalone));
            }
            stats.children = rows.len();
        }
        Mode::Hierarchical => {
            let families = group_families(reconstruction.records);
            stats.families = families.len();
            let mut parent_keys: IndexMap<String, &str> = IndexMap::new();
            for family in &families {
                let Some(first) = family.first() else { continue };
                let key = parent_key(first, &options.policy);
                if let Some(previous) = parent_keys.insert(key.clone(), family.title.as_str()) {
                    log_warning(format!(
                        "Parent SKU {} shared by \"{}\" and \"{}\"",
                        key, previous, family.title
                    ));
                }
                rows.push(render(first, &Role::Parent { key: key.clone() }));
                stats.parents += 1;

                let role = Role::Child { parent_key: key };
                for member in &family.members {
                    rows.push(render(member, &role));
                    stats.children += 1;
                }
            }
        }
    }

    TransformOutput { rows, stats }
}

/// File-level options.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub transform: TransformOptions,
    pub template_path: PathBuf,
    /// Fixed description file, read only when the policy uses one.
    pub description_path: Option<PathBuf>,
    /// Input delimiter, auto-detected when `None`.
    pub delimiter: Option<char>,
    pub include_example_row: bool,
    pub write: WriteOptions,
}

impl ConvertOptions {
    /// Preset defaults with paths and seller facts from `settings`.
    pub fn from_preset(preset: Preset, settings: &Settings) -> Self {
        Self {
            transform: TransformOptions {
                mode: preset.mode(),
                policy: preset.policy(),
                templates: AuxiliaryTemplates::from_env(),
                seller: settings.seller.clone(),
            },
            template_path: settings.template_path.clone(),
            description_path: Some(settings.description_path.clone()),
            delimiter: None,
            include_example_row: preset.include_example_row(),
            write: WriteOptions {
                encoding: settings.output_encoding.clone(),
                ..Default::default()
            },
        }
    }
}

/// Outcome of [`convert_file`].
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub output: PathBuf,
    pub input_encoding: String,
    pub delimiter: char,
    pub columns: usize,
    pub stats: TransformStats,
    pub output_encoding: String,
    pub bytes: usize,
}

/// `<stem>_amazon.txt` in the working directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{}_amazon.txt", stem))
}

/// Read `input`, convert it and write the flat file to `output`.
///
/// Nothing is written when any step fails.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> PipelineResult<ConvertReport> {
    if !input.exists() {
        return Err(PipelineError::InputNotFound(input.to_path_buf()));
    }

    log_info(format!("Reading {}", input.display()));
    let parsed = parse_file_auto(input, options.delimiter)?;
    log_info_indent(
        format!(
            "{} rows, {} columns (encoding: {}, delimiter: {:?})",
            parsed.records.len(),
            parsed.headers.len(),
            parsed.encoding,
            parsed.delimiter
        ),
        1,
    );

    let headers = TemplateHeaders::load(&options.template_path)?;
    let schema = headers.schema();
    log_info_indent(
        format!("Template {} ({} columns)", options.template_path.display(), schema.len()),
        1,
    );

    let mut transform_options = options.transform.clone();
    if transform_options.policy.description == DescriptionSource::Fixed {
        if let Some(path) = &options.description_path {
            transform_options.templates = transform_options.templates.with_description_file(path)?;
        }
    }

    let result = transform(&parsed.records, &schema, &transform_options);
    let stats = &result.stats;
    if stats.dropped > 0 {
        log_warning(format!("Skipped {} rows without a variant SKU", stats.dropped));
    }
    match transform_options.mode {
        Mode::Standalone => log_info(format!("Mapped {} products", stats.children)),
        Mode::Hierarchical => log_info(format!(
            "Mapped {} families ({} parent rows, {} child rows)",
            stats.families, stats.parents, stats.children
        )),
    }

    let framing = headers.framing_rows(options.include_example_row);
    let summary: WriteSummary = write_flat_file(output, &framing, &result.rows, &options.write)?;
    log_success(format!(
        "Wrote {} rows to {} ({}, {} bytes)",
        stats.rows(),
        output.display(),
        summary.encoding,
        summary.bytes
    ));

    Ok(ConvertReport {
        output: output.to_path_buf(),
        input_encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        columns: schema.len(),
        stats: result.stats,
        output_encoding: summary.encoding,
        bytes: summary.bytes,
    })
}
