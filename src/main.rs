use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tier_splitter::pipeline::{self, SheetInspection, SplitReport};
use tier_splitter::{Result, SplitterConfig, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Split(args) => execute_split(args),
        Command::Inspect(args) => execute_inspect(args),
    }
}

fn execute_split(args: SplitArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let report = match &args.out_dir {
        Some(dir) => pipeline::split_to_directory(&args.input, dir, &config)?,
        None => {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.archive_name));
            pipeline::split_to_archive(&args.input, &output, &config)?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let inspections = pipeline::inspect(&args.input, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspections)?);
    } else {
        print_inspections(&inspections);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SplitterConfig> {
    match path {
        Some(path) => SplitterConfig::from_path(path),
        None => Ok(SplitterConfig::default()),
    }
}

fn print_report(report: &SplitReport) {
    if report.tiers.is_empty() {
        println!("No tier columns found in {} sheet(s).", report.sheets_read);
        return;
    }
    for tier in &report.tiers {
        println!(
            "{}: {} sheet(s), {} row(s)",
            tier.file_name,
            tier.sheets.len(),
            tier.rows
        );
    }
}

fn print_inspections(inspections: &[SheetInspection]) {
    for sheet in inspections {
        println!("{}", sheet.sheet);
        for tier in &sheet.tiers {
            match &tier.columns {
                None => println!("  {}: no tier column", tier.tier),
                Some(columns) => {
                    let mapped: Vec<String> = columns
                        .iter()
                        .map(|column| format!("{} <- '{}'", column.field, column.source_header))
                        .collect();
                    println!("  {}: {}", tier.tier, mapped.join(", "));
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Split a master price list workbook into one workbook per price tier."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one workbook per tier, zipped or into a directory.
    Split(SplitArgs),
    /// Show which columns each sheet resolves for every tier.
    Inspect(InspectArgs),
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Master price list workbook (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Zip archive to write. Defaults to the configured archive name.
    #[arg(long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Write the tier workbooks into this directory instead of a zip.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// JSON configuration overriding tiers, aliases, and matching rules.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Master price list workbook (.xlsx).
    #[arg(long)]
    input: PathBuf,

    /// JSON configuration overriding tiers, aliases, and matching rules.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the inspection as JSON.
    #[arg(long)]
    json: bool,
}
