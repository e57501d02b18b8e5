//! Flat-file writer.
//!
//! Output layout: the template framing rows verbatim, then one tab-separated
//! row per output record. The whole file is rendered and encoded in memory;
//! the destination is only touched once that succeeded.

use encoding_rs::Encoding;
use std::path::Path;

use crate::error::{WriteError, WriteResult};
use crate::logs::log_warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }

    fn terminator(&self) -> csv::Terminator {
        match self {
            LineEnding::Crlf => csv::Terminator::CRLF,
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Encoding label understood by `encoding_rs` (`windows-1252`, `utf-8`, ...).
    pub encoding: String,
    pub line_ending: LineEnding,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            encoding: crate::config::DEFAULT_OUTPUT_ENCODING.to_string(),
            line_ending: LineEnding::Crlf,
        }
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub bytes: usize,
    pub encoding: String,
    /// Some characters had no mapping and became numeric character references.
    pub substituted: bool,
}

/// Framing rows and data rows as text, before encoding.
pub fn render_text(
    framing: &[Vec<String>],
    rows: &[Vec<String>],
    line_ending: LineEnding,
) -> WriteResult<String> {
    let mut text = String::new();
    for row in framing {
        text.push_str(&row.join("\t"));
        text.push_str(line_ending.as_str());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(line_ending.terminator())
        .quote_style(csv::QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let data = writer.into_inner().map_err(|e| WriteError::IoError(e.into_error()))?;
    text.push_str(&String::from_utf8_lossy(&data));
    Ok(text)
}

/// Encode text with the given label.
///
/// Returns the bytes and whether any character had to be substituted.
pub fn encode(text: &str, label: &str) -> WriteResult<(Vec<u8>, bool)> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| WriteError::UnknownEncoding(label.to_string()))?;
    let (bytes, _, had_errors) = encoding.encode(text);
    Ok((bytes.into_owned(), had_errors))
}

/// Render, encode and write a flat file.
pub fn write_flat_file<P: AsRef<Path>>(
    path: P,
    framing: &[Vec<String>],
    rows: &[Vec<String>],
    options: &WriteOptions,
) -> WriteResult<WriteSummary> {
    let text = render_text(framing, rows, options.line_ending)?;
    let (bytes, substituted) = encode(&text, &options.encoding)?;
    if substituted {
        log_warning(format!(
            "Some characters are not representable in {} and were written as character references",
            options.encoding
        ));
    }
    std::fs::write(path.as_ref(), &bytes)?;
    Ok(WriteSummary {
        bytes: bytes.len(),
        encoding: options.encoding.clone(),
        substituted,
    })
}
