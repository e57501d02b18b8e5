//! # Flatfile - storefront catalog export to marketplace upload file
//!
//! Flatfile converts a denormalized storefront product export (one parent row
//! carrying shared fields, followed by sparse variant rows) into the
//! tab-delimited flat file a marketplace inventory template expects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │ Export CSV  │──▶│   Parser    │──▶│  Hierarchy  │──▶│   Mapper    │──▶│  Flat file  │
//! │ (UTF8/1252) │   │ (auto-enc)  │   │ (fold scan) │   │ + bullets   │   │ (tab, CRLF) │
//! └─────────────┘   └─────────────┘   └─────────────┘   │ + emitter   │   └─────────────┘
//!                                                       └─────────────┘
//!                                     Template JSON ──▶ schema + framing rows
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flatfile::{convert_file, ConvertOptions, Preset, Settings};
//! use std::path::Path;
//!
//! let options = ConvertOptions::from_preset(Preset::Flat, &Settings::from_env());
//! let report = convert_file(Path::new("products_export.csv"), Path::new("amazon.txt"), &options)?;
//! println!("Wrote {} rows", report.stats.rows());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Source, reconstructed and target records
//! - [`markup`] - Description markup normalization
//! - [`parser`] - CSV parsing with auto-detection
//! - [`template`] - Upload template headers
//! - [`transform`] - Hierarchy, mapping, bullets, emission, pipeline
//! - [`writer`] - Flat-file rendering and encoding
//! - [`config`] - Environment settings and seller profile
//! - [`logs`] - Log broadcaster

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod markup;
pub mod parser;
pub mod template;

// Transformation
pub mod transform;

// Output
pub mod writer;

// Configuration and logging
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, PipelineError, PipelineResult, ReadError, ReadResult, TemplateError,
    TemplateResult, WriteError, WriteResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    BulletSequence, ParentContext, ProductFamily, ReconstructedRecord, Role, SourceRecord,
    TargetRecord, TargetSchema,
};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    ParseResult,
};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use template::TemplateHeaders;
pub use transform::{
    convert_file, default_output_path, reconstruct, transform, ConvertOptions, ConvertReport,
    FieldMapper, MappingPolicy, Mode, Preset, TransformOptions, TransformOutput, TransformStats,
};

// =============================================================================
// Re-exports - Output and configuration
// =============================================================================

pub use config::{AuxiliaryTemplates, SellerProfile, Settings};
pub use writer::{write_flat_file, LineEnding, WriteOptions, WriteSummary};
