//! Error types for the flat-file conversion pipeline.
//!
//! - [`ReadError`] - Catalog export reading/parsing errors
//! - [`TemplateError`] - Upload template loading errors
//! - [`WriteError`] - Flat-file writing errors
//! - [`ConfigError`] - Policy and settings errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Missing source fields and schema-shape mismatches are never errors:
//! the mapper resolves them to empty strings.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Reading Errors
// =============================================================================

/// Errors while reading a catalog export.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed delimited content.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,

    /// Delimiter is not a single ASCII character.
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

impl From<csv::Error> for ReadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => ReadError::IoError(io),
            kind => ReadError::ParseError {
                line,
                message: format!("{:?}", kind),
            },
        }
    }
}

// =============================================================================
// Template Errors
// =============================================================================

/// Errors while loading the upload template headers.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// IO error.
    #[error("Template IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Template JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The template declares no columns.
    #[error("Template declares no columns")]
    NoColumns,
}

// =============================================================================
// Writing Errors
// =============================================================================

/// Errors while writing the flat file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// IO error.
    #[error("Failed to write file: {0}")]
    IoError(#[from] std::io::Error),

    /// Delimited writer error.
    #[error("CSV writer error: {0}")]
    CsvError(#[from] csv::Error),

    /// Output encoding label not recognised.
    #[error("Unknown output encoding: {0}")]
    UnknownEncoding(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors from policy files and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("Config IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Config JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unknown preset name.
    #[error("Unknown mode '{0}' (expected flat, variations or factory-pack)")]
    UnknownMode(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert_file`].
/// Any of these aborts the run before the output file is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file does not exist.
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Reading error.
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    /// Template error.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Writing error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reading operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Result type for writing operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
