use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use quakeflux_core::outputs::{publish, ParquetDirectorySink};
use quakeflux_core::pipeline::{run_pipeline, PipelineOutput};
use quakeflux_core::resolver::resolve_with_tier;
use quakeflux_parser::{locate_latest_extract, read_extract, ParserError};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{ConfigLayer, Settings};

const EXIT_FAILURE: u8 = 1;
/// Exit status for "no input batch to process", distinct from ordinary failures.
const EXIT_INPUT_UNAVAILABLE: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Seismic event cleaning and aggregation", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./quakeflux.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean the latest extract and publish the event, daily and country tables
    Run(PipelineArgs),
    /// Run the pipeline without writing and print the aggregate tables
    Inspect(PipelineArgs),
    /// Resolve a single place/coordinate pair to a country label
    Resolve(ResolveArgs),
}

#[derive(Args, Debug, Default)]
struct PipelineArgs {
    /// Process this extract instead of the latest one in the raw directory
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    raw_dir: Option<PathBuf>,
    #[arg(long)]
    stage_dir: Option<PathBuf>,
    /// Glob used to find extracts in the raw directory
    #[arg(long)]
    pattern: Option<String>,
    /// IANA zone used to bucket daily counts
    #[arg(long)]
    timezone: Option<String>,
    /// Number of countries kept in the country table
    #[arg(long)]
    top: Option<usize>,
    #[arg(long)]
    partitions: Option<usize>,
}

impl PipelineArgs {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            raw_dir: self.raw_dir.clone(),
            stage_dir: self.stage_dir.clone(),
            input_pattern: self.pattern.clone(),
            timezone: self.timezone.clone(),
            top_countries: self.top,
            partitions: self.partitions,
        }
    }
}

#[derive(Args, Debug)]
struct ResolveArgs {
    #[arg(long)]
    place: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
}

fn main() -> ExitCode {
    // Loaded before the subscriber so RUST_LOG may come from .env.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code_for(&err);
            if code == EXIT_INPUT_UNAVAILABLE {
                error!(error = %format_args!("{err:#}"), "no input batch to process");
            } else {
                error!(error = %format_args!("{err:#}"), "quakeflux failed");
            }
            ExitCode::from(code)
        }
    }
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => handle_run(cli.config.as_deref(), args),
        Command::Inspect(args) => handle_inspect(cli.config.as_deref(), args),
        Command::Resolve(args) => {
            handle_resolve(args);
            Ok(())
        }
    }
}

fn handle_run(config_path: Option<&Path>, args: PipelineArgs) -> Result<()> {
    let settings = Settings::load(config_path, args.layer())?;
    let output = execute(&settings, args.input.as_deref())?;

    let sink = ParquetDirectorySink::new(&settings.stage_dir);
    publish(&sink, &output).context("failed to publish output tables")?;

    info!(
        stage_dir = %settings.stage_dir.display(),
        events = output.events.len(),
        days = output.daily.len(),
        countries = output.countries.len(),
        "outputs published"
    );
    Ok(())
}

fn handle_inspect(config_path: Option<&Path>, args: PipelineArgs) -> Result<()> {
    let settings = Settings::load(config_path, args.layer())?;
    let output = execute(&settings, args.input.as_deref())?;

    let mut daily = Table::new();
    daily.set_header(vec!["date", "count"]);
    for row in &output.daily {
        daily.add_row(vec![row.date.to_string(), row.count.to_string()]);
    }

    let mut countries = Table::new();
    countries.set_header(vec!["country", "count"]);
    for row in &output.countries {
        countries.add_row(vec![row.country.clone(), row.count.to_string()]);
    }

    let report = &output.report;
    println!(
        "{} rows read: {} events, {} unresolved, {} rejected",
        report.input_rows, report.emitted, report.unresolved, report.rejected
    );
    for (reason, count) in &report.rejected_by_reason {
        println!("  {reason}: {count}");
    }
    println!("{daily}");
    println!("{countries}");
    Ok(())
}

fn handle_resolve(args: ResolveArgs) {
    let (label, tier) = resolve_with_tier(args.lat, args.lon, args.place.as_deref());
    match tier {
        Some(tier) => println!("{label} ({tier})"),
        None => println!("{label} (no tier matched)"),
    }
}

/// Locates and reads the input batch, then runs the pipeline over it. A missing batch
/// fails here, before any processing starts.
fn execute(settings: &Settings, explicit_input: Option<&Path>) -> Result<PipelineOutput> {
    let input = match explicit_input {
        Some(path) => path.to_path_buf(),
        None => locate_latest_extract(&settings.raw_dir, &settings.input_pattern)
            .context("failed to locate an input extract")?,
    };
    info!(path = %input.display(), "reading extract");

    let table = read_extract(&input)
        .with_context(|| format!("failed to read extract {}", input.display()))?;
    if table.is_empty() {
        warn!(path = %input.display(), "extract has no data rows");
    }
    info!(rows = table.len(), "extract loaded");

    let output = run_pipeline(&table, &settings.pipeline_options())?;
    Ok(output)
}

fn is_input_unavailable(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ParserError>(),
        Some(ParserError::NoExtractFound { .. }) | Some(ParserError::Io { .. })
    )
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    if is_input_unavailable(err) {
        EXIT_INPUT_UNAVAILABLE
    } else {
        EXIT_FAILURE
    }
}
