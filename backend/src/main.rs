//! Flatfile CLI - Convert storefront exports to marketplace flat files
//!
//! # Main Commands
//!
//! ```bash
//! flatfile convert products_export.csv                      # Flat listings (one row per variant)
//! flatfile convert export.csv --mode factory-pack -o out.txt  # Parent/child variations
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! flatfile parse products_export.csv     # Reconstructed records as JSON
//! flatfile inspect                       # Template column summary
//! flatfile policy --mode variations      # Built-in policy as JSON
//! ```

use clap::{Parser, Subcommand};
use flatfile::logs::{log_error, log_info};
use flatfile::{
    convert_file, default_output_path, parse_file_auto, reconstruct, ConvertOptions, LineEnding,
    MappingPolicy, Preset, Settings, TemplateHeaders,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flatfile")]
#[command(about = "Convert storefront exports to marketplace flat files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an export to a tab-delimited upload file
    Convert {
        /// Input export CSV
        input: PathBuf,

        /// Output file (default: ./<input stem>_amazon.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// flat, variations or factory-pack
        #[arg(short, long, default_value = "flat")]
        mode: Preset,

        /// Template headers JSON (default: $FLATFILE_TEMPLATE)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Fixed description text file (default: $FLATFILE_DESCRIPTION)
        #[arg(long)]
        description: Option<PathBuf>,

        /// Policy JSON replacing the preset's policy
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Input delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output encoding (default: $FLATFILE_OUTPUT_ENCODING)
        #[arg(short, long)]
        encoding: Option<String>,

        /// LF line endings instead of CRLF
        #[arg(long)]
        lf: bool,

        /// Do not write the template's example row
        #[arg(long)]
        no_example_row: bool,
    },

    /// Parse an export and output reconstructed records as JSON
    Parse {
        /// Input export CSV
        input: PathBuf,

        /// Input delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show template column count and repeated columns
    Inspect {
        /// Template headers JSON (default: $FLATFILE_TEMPLATE)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Print a built-in policy as JSON
    Policy {
        #[arg(short, long, default_value = "flat")]
        mode: Preset,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            mode,
            template,
            description,
            policy,
            delimiter,
            encoding,
            lf,
            no_example_row,
        } => {
            let mut options = ConvertOptions::from_preset(mode, &settings);
            if let Some(path) = template {
                options.template_path = path;
            }
            if let Some(path) = description {
                options.description_path = Some(path);
            }
            if let Some(encoding) = encoding {
                options.write.encoding = encoding;
            }
            if lf {
                options.write.line_ending = LineEnding::Lf;
            }
            if no_example_row {
                options.include_example_row = false;
            }
            options.delimiter = delimiter;
            cmd_convert(&input, output, policy.as_deref(), options)
        }

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),

        Commands::Inspect { template } => {
            cmd_inspect(template.as_deref().unwrap_or(settings.template_path.as_path()))
        }

        Commands::Policy { mode } => cmd_policy(mode),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<PathBuf>,
    policy: Option<&Path>,
    mut options: ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = policy {
        options.transform.policy = MappingPolicy::load(path)?;
        log_info(format!("Policy: {}", path.display()));
    }
    let output = output.unwrap_or_else(|| default_output_path(input));

    let report = convert_file(input, &output, &options)?;
    eprintln!(
        "   {} data rows, {} columns, {} bytes",
        report.stats.rows(),
        report.columns,
        report.bytes
    );
    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("Parsing: {}", input.display()));

    let result = parse_file_auto(input, delimiter)?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.headers.len());

    let reconstruction = reconstruct(&result.records);
    eprintln!(
        "   Records: {} ({} rows without SKU)",
        reconstruction.records.len(),
        reconstruction.dropped
    );

    let json = serde_json::to_string_pretty(&reconstruction.records)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_inspect(template: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let headers = TemplateHeaders::load(template)?;
    let schema = headers.schema();

    println!("Template: {}", template.display());
    println!("Columns: {}", schema.len());
    println!("Distinct names: {}", schema.names().count());
    for (name, count) in schema.repeated() {
        println!("  {} x{}", name, count);
    }
    Ok(())
}

fn cmd_policy(mode: Preset) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", mode.policy().to_json()?);
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_info(format!("Saved to: {}", p.display()));
        }
        None => println!("{}", content),
    }
    Ok(())
}
