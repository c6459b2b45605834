//! SR1.5 scenario assessment
//!
//! Categorises an ensemble of IAMC scenarios and writes the metadata workbook.
//!
//! # Usage
//!
//! ```bash
//! sr15-assess assess --data sr15_scenarios.csv \
//!   --references sr15_references.csv \
//!   --output-dir output/ --summary
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sr15_core::io::{IamcReader, ReferenceReader, WorkbookWriter};
use sr15_indicators::specs::Specs;
use sr15_indicators::{assess, AssessmentConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "sr15-assess")]
#[command(about = "Categorise IAMC scenarios and compute the SR1.5 indicators")]
struct Cli {
    /// Log debug messages
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the assessment and write the metadata workbook
    Assess(AssessArgs),
    /// Print the default configuration, including the full list of indicators
    DumpConfig {
        /// Configuration to start from
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// Scenario data in the IAMC wide format
    #[arg(short, long)]
    data: PathBuf,

    /// Table of scientific references per model and scenario
    #[arg(short, long)]
    references: Option<PathBuf>,

    /// Assessment settings in TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the workbook sheets
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Also write the summary statistics of the illustrative pathways
    #[arg(long)]
    summary: bool,
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "warn",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AssessmentConfig> {
    match path {
        Some(path) => AssessmentConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(AssessmentConfig::default()),
    }
}

fn run_assess(args: &AssessArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let dataset = IamcReader::new(&args.data)
        .with_region(&config.region)
        .read()
        .with_context(|| format!("Failed to read scenario data {}", args.data.display()))?;
    let references = args
        .references
        .as_deref()
        .map(|path| {
            ReferenceReader::new(path)
                .read()
                .with_context(|| format!("Failed to read references {}", path.display()))
        })
        .transpose()?;

    let markers = config.marker_scenarios();
    let specs = Specs::new(&markers);
    let summary = args.summary.then(|| {
        sr15_indicators::statistics::SummaryStatistics::illustrative_pathways(
            config.summary.base_year,
            &config.summary.compare_years,
        )
    });

    let assessment = assess(config, &dataset, references).context("Assessment failed")?;

    let writer = WorkbookWriter::new(&args.output_dir)?;
    writer.write(&assessment)?;
    writer.write_toml("specs", &specs)?;
    if let Some(summary) = summary {
        let table = summary.summarize(&dataset, &assessment.meta, &markers.labels());
        let path = writer.write_table(&table)?;
        info!("Wrote summary statistics to {}", path.display());
    }
    Ok(())
}

fn dump_config(path: Option<&Path>) -> Result<String> {
    let mut config = load_config(path)?;
    if config.indicators.is_none() {
        config.indicators = Some(config.default_indicators(None));
    }
    Ok(config.to_toml()?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Command::Assess(args) => run_assess(args),
        Command::DumpConfig { config } => {
            print!("{}", dump_config(config.as_deref())?);
            Ok(())
        }
    }
}
