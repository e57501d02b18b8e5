//! File-to-file conversion tests.

use flatfile::logs::{LogLevel, LOG_BROADCASTER};
use flatfile::{convert_file, ConvertOptions, PipelineError, Preset, Settings, TemplateHeaders};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const EXPORT: &str = "\
Handle,Title,Body (HTML),Option1 Value,Variant SKU,Variant Price,Variant Inventory Qty,UPC (product.metafields.facts.upc),color code (product.metafields.custom.color_code)
red-paint,Red Paint,\"<ul><li>Fast drying</li><li>Bright, bold red</li></ul>\",Quart,RP-Q1,29.99,12,012345678905,
red-paint,,,Gallon,RP-G1,89.99,3,,
red-paint,,,,,,,,
for-toyota-040-gallon-paint,Toyota 040 Super White,<p>White</p>,Quart,T040-Q,59.00,1,,040
for-toyota-040-gallon-paint,,,Gallon,T040-G,149.00,1,,
";

const TEMPLATE: &str = r#"{
    "settings": ["settings=TemplateType=fptcustom", "Version=2024.1"],
    "instructions": ["Fill in the rows below"],
    "categories": ["Offer", "", "Product"],
    "columns": [
        "SKU", "Item Name", "Product Id Type", "Product Id", "Parentage Level", "Parent SKU",
        "Size", "Quantity (US)", "Bullet Point", "Bullet Point", "Bullet Point",
        "Dangerous Goods Regulations", "Dangerous Goods Regulations", "GHS Class", "GHS Class"
    ],
    "attributes": ["contribution_sku#1.value", "item_name#1.value"],
    "example_row": ["ABC123", "Example Item"]
}"#;

struct Fixture {
    dir: TempDir,
    input: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("products_export.csv");
        std::fs::write(&input, EXPORT).unwrap();
        std::fs::write(dir.path().join("template.json"), TEMPLATE).unwrap();
        let description = dir.path().join("description.txt");
        std::fs::write(description, "Factory pack\nurethane base.\n").unwrap();
        Self { dir, input }
    }

    fn options(&self, preset: Preset) -> ConvertOptions {
        let mut options = ConvertOptions::from_preset(preset, &Settings::from_env());
        options.template_path = self.dir.path().join("template.json");
        options.description_path = Some(self.dir.path().join("description.txt"));
        options.write.encoding = "windows-1252".to_string();
        options
    }

    fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn read_lines(path: &Path) -> Vec<Vec<String>> {
    let bytes = std::fs::read(path).unwrap();
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
    assert!(text.ends_with("\r\n"));
    text.split("\r\n")
        .filter(|line| !line.is_empty())
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

#[test]
fn test_flat_conversion_writes_framing_then_rows() {
    let fixture = Fixture::new();
    let output = fixture.output("flat.txt");

    let report = convert_file(&fixture.input, &output, &fixture.options(Preset::Flat)).unwrap();
    assert_eq!(report.stats.source_rows, 5);
    assert_eq!(report.stats.dropped, 1);
    assert_eq!(report.stats.rows(), 4);
    assert_eq!(report.columns, 15);

    let lines = read_lines(&output);
    // settings, instructions, categories, columns, attributes, example row, 4 data rows
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0][0], "settings=TemplateType=fptcustom");
    assert_eq!(lines[3][0], "SKU");
    assert_eq!(lines[5][0], "ABC123");
    assert!(lines.iter().all(|l| l.len() == 15));

    let first = &lines[6];
    assert_eq!(first[0], "RP-Q1");
    assert_eq!(first[1], "Red Paint - Quart");
    assert_eq!(first[2], "UPC");
    assert_eq!(first[3], "012345678905");
    assert_eq!(first[6], "Quart");
    assert_eq!(first[7], "12");
    assert_eq!(first[8], "Fast drying");
    assert_eq!(first[9], "Bright, bold red");
    assert_eq!(first[10], "");
    assert_eq!(
        &first[11..],
        &["Other", "GHS", "Amazon Specific No Label With Warning", "Irritant"]
    );

    let gallon = &lines[7];
    assert_eq!(gallon[0], "RP-G1");
    assert_eq!(gallon[1], "Red Paint - Gallon");
    assert_eq!(gallon[2], "GTIN Exempt");
    assert_eq!(gallon[8], "Fast drying");
}

#[test]
fn test_factory_pack_parent_child_rows() {
    let fixture = Fixture::new();
    let output = fixture.output("factory.txt");

    let options = fixture.options(Preset::FactoryPack);
    let report = convert_file(&fixture.input, &output, &options).unwrap();
    assert_eq!(report.stats.families, 2);
    assert_eq!(report.stats.parents, 2);
    assert_eq!(report.stats.children, 4);

    let lines = read_lines(&output);
    // no example row for variations
    assert_eq!(lines.len(), 5 + 6);
    let data = &lines[5..];

    let red_parent = &data[0];
    assert_eq!(red_parent[0], "SP-PARENT-RED");
    assert_eq!(red_parent[4], "Parent");
    assert_eq!(red_parent[5], "");
    assert_eq!(red_parent[7], "");
    for child in &data[1..3] {
        assert_eq!(child[4], "Child");
        assert_eq!(child[5], red_parent[0]);
        assert_eq!(child[7], "30");
    }

    let toyota_parent = &data[3];
    assert_eq!(toyota_parent[0], "SP-PARENT-040");
    assert_eq!(toyota_parent[8], "Color Code: 040");
    assert_eq!(data[4][6], "1 Quart");
    assert_eq!(data[5][6], "1 Gallon");
    assert_eq!(data[5][10], "Surface must be primed or previously painted and sufficiently prepped before applying basecoat. Use Adhesion Promoter on raw plastic.");
}

#[test]
fn test_conversion_is_idempotent() {
    let fixture = Fixture::new();
    let first = fixture.output("first.txt");
    let second = fixture.output("second.txt");
    let options = fixture.options(Preset::Variations);

    convert_file(&fixture.input, &first, &options).unwrap();
    convert_file(&fixture.input, &second, &options).unwrap();
    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn test_missing_template_writes_nothing() {
    let fixture = Fixture::new();
    let output = fixture.output("never.txt");
    let mut options = fixture.options(Preset::Flat);
    options.template_path = fixture.output("missing.json");

    let result = convert_file(&fixture.input, &output, &options);
    assert!(matches!(result, Err(PipelineError::Template(_))));
    assert!(!output.exists());
}

#[test]
fn test_missing_input() {
    let fixture = Fixture::new();
    let missing = fixture.output("nope.csv");
    let result = convert_file(&missing, &fixture.output("out.txt"), &fixture.options(Preset::Flat));
    assert!(matches!(result, Err(PipelineError::InputNotFound(_))));
}

#[test]
fn test_latin1_export_converted_to_cp1252() {
    let fixture = Fixture::new();
    let input = fixture.output("latin1.csv");
    let mut bytes = b"Title,Variant SKU,Option1 Value\nCaf".to_vec();
    bytes.extend_from_slice(&[0xE9]);
    bytes.extend_from_slice(b" Cr\xE8me,CC-1,Pint\n");
    std::fs::write(&input, bytes).unwrap();

    let output = fixture.output("latin1.txt");
    convert_file(&input, &output, &fixture.options(Preset::Flat)).unwrap();

    let written = std::fs::read(&output).unwrap();
    assert!(written.windows(5).any(|w| w == b"Caf\xE9 "));
    let lines = read_lines(&output);
    assert_eq!(lines[6][1], "Café Crème - Pint");
}

#[test]
fn test_template_schema_loaded_from_file() {
    let fixture = Fixture::new();
    let headers = TemplateHeaders::load(fixture.dir.path().join("template.json")).unwrap();
    assert_eq!(
        headers.schema().repeated(),
        vec![("Bullet Point", 3), ("Dangerous Goods Regulations", 2), ("GHS Class", 2)]
    );
}

#[test]
fn test_dropped_rows_reported_to_log_subscribers() {
    use tokio::sync::broadcast::error::TryRecvError;

    let fixture = Fixture::new();
    let mut logs = LOG_BROADCASTER.subscribe();
    convert_file(&fixture.input, &fixture.output("logged.txt"), &fixture.options(Preset::Flat))
        .unwrap();

    let mut seen = Vec::new();
    loop {
        match logs.try_recv() {
            Ok(entry) => seen.push(entry),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    let logged = |level: LogLevel, text: &str| {
        seen.iter().any(|entry| entry.level == level && entry.message.contains(text))
    };
    assert!(logged(LogLevel::Warning, "Skipped 1 rows without a variant SKU"));
    assert!(logged(LogLevel::Success, "logged.txt"));
}
