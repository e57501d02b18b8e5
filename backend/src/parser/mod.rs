//! Catalog export reader with encoding and delimiter auto-detection.
//!
//! Turns a delimited storefront export into ordered [`SourceRecord`]s.
//! No catalog-specific logic here.

use indexmap::IndexMap;
use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::models::SourceRecord;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows in file order
    pub records: Vec<SourceRecord>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 wins outright; anything else goes through chardet and is
/// folded onto the single-byte Western encodings exports actually use.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;
    match charset.to_lowercase().as_str() {
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        _ => "windows-1252".to_string(),
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Never fails: unknown labels fall back to windows-1252, which maps every byte.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        label => encoding_rs::Encoding::for_label(label.as_bytes())
            .unwrap_or(encoding_rs::WINDOWS_1252)
            .decode_without_bom_handling(bytes)
            .0
            .into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text into records keyed by header.
///
/// Short rows are padded with empty values, extra values are ignored and
/// blank lines are skipped. Quoted fields may span lines.
pub fn parse_records(
    content: &str,
    delimiter: char,
) -> ReadResult<(Vec<String>, Vec<SourceRecord>)> {
    if !delimiter.is_ascii() {
        return Err(ReadError::InvalidDelimiter(delimiter));
    }
    if content.trim().is_empty() {
        return Err(ReadError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(ReadError::NoHeaders);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let fields: IndexMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), row.get(i).unwrap_or("").to_string()))
            .collect();
        records.push(SourceRecord::new(fields));
    }

    Ok((headers, records))
}

/// Parse an export file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_file_auto("products_export.csv", None)?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.records.len());
/// ```
pub fn parse_file_auto<P: AsRef<Path>>(
    path: P,
    delimiter: Option<char>,
) -> ReadResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes, delimiter)
}

/// Parse export bytes with auto-detection of encoding and (unless given) delimiter.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<char>) -> ReadResult<ParseResult> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.is_empty() {
        return Err(ReadError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    let (headers, records) = parse_records(&content, delimiter)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let (headers, rows) = parse_records("Handle,Title\nred,Red Paint\nblue,Blue", ',').unwrap();

        assert_eq!(headers, vec!["Handle", "Title"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Title"), "Red Paint");
        assert_eq!(rows[1].get("Handle"), "blue");
    }

    #[test]
    fn test_quoted_values_with_commas_and_newlines() {
        let csv = "Title,Body (HTML)\n\"Paint, Red\",\"<ul>\n<li>One</li>\n</ul>\"\n";
        let (_, rows) = parse_records(csv, ',').unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Title"), "Paint, Red");
        assert!(rows[0].get("Body (HTML)").contains("<li>One</li>"));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let (_, rows) = parse_records("a,b\n1,2\n,\n3,4\n", ',').unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_short_rows_padded() {
        let (_, rows) = parse_records("a,b,c\n1,,3\n4", ',').unwrap();

        assert_eq!(rows[0].get("b"), "");
        assert_eq!(rows[0].get("c"), "3");
        assert_eq!(rows[1].get("a"), "4");
        assert_eq!(rows[1].get("c"), "");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let (_, rows) = parse_records("a,b\n1,2,3,4", ',').unwrap();

        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("b"), "2");
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_records("", ','), Err(ReadError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(UTF8_BOM, None), Err(ReadError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_bom_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Handle,Title\nred,Red Paint");
        let result = parse_bytes_auto(&bytes, None).unwrap();

        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.headers[0], "Handle");
        assert_eq!(result.records[0].get("Handle"), "red");
    }

    #[test]
    fn test_single_byte_decoding() {
        // "Café Noir" with 0xE9 as in windows-1252 / latin-1
        let bytes: &[u8] = b"Title\nCaf\xE9 Noir";
        let result = parse_bytes_auto(bytes, None).unwrap();

        assert_ne!(result.encoding, "utf-8");
        assert_eq!(result.records[0].get("Title"), "Café Noir");
    }

    #[test]
    fn test_explicit_delimiter_overrides_detection() {
        let result = parse_bytes_auto(b"a;b\n1;2", Some(',')).unwrap();
        assert_eq!(result.delimiter, ',');
        assert_eq!(result.headers, vec!["a;b"]);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let result = parse_bytes_auto("aéb\n1é2".as_bytes(), Some('é'));
        assert!(matches!(result, Err(ReadError::InvalidDelimiter('é'))));
    }
}
