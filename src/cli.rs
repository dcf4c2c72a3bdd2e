//! CLI definition and dispatch.
//!
//! Every command loads an INI file through [`FileConfigAdapter`], resolves it
//! into a [`ScreenerConfig`] and a [`FallbackDataPort`], then hands off to the
//! domain. Errors surface once, in [`run`], as `error: ...` plus an exit code.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::fallback_adapter::FallbackDataPort;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::signal_report::ReportFormat;
use crate::domain::basket::{default_basket, parse_codes};
use crate::domain::config_validation::{
    parse_date, validate_data_config, validate_screener_config,
};
use crate::domain::error::ScreenerError;
use crate::domain::indicator::{OscillatorParams, DEFAULT_D_SMOOTH, DEFAULT_K_WINDOW};
use crate::domain::policy::{SignalPolicy, UnknownPolicy};
use crate::domain::screener::{self, ScreenerConfig, DEFAULT_LOOKBACK_DAYS};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_WORKERS: i64 = 4;

#[derive(Parser, Debug)]
#[command(name = "stochscreen", about = "Stochastic oscillator stock screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen the basket and print one signal per symbol
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Signal policy: stateful or latest-only
        #[arg(long)]
        mode: Option<String>,
        /// Report format: table or csv
        #[arg(long)]
        format: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Comma-separated codes replacing the configured basket
        #[arg(long)]
        code: Option<String>,
    },
    /// Write the bar-by-bar oscillator and events for one symbol
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        format: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a config file without fetching data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the `info`
/// default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(cli: Cli) -> Result<(), ScreenerError> {
    let today = chrono::Local::now().date_naive();
    match cli.command {
        Command::Screen {
            config,
            mode,
            format,
            output,
            code,
        } => run_screen(
            &config,
            mode.as_deref(),
            format.as_deref(),
            output.as_ref(),
            code.as_deref(),
            today,
        ),
        Command::Chart {
            config,
            code,
            mode,
            format,
            output,
        } => run_chart(
            &config,
            &code,
            mode.as_deref(),
            format.as_deref(),
            output.as_ref(),
            today,
        ),
        Command::Validate { config } => {
            let summary = run_validate(&config, today)?;
            print!("{summary}");
            Ok(())
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ScreenerError> {
    FileConfigAdapter::from_file(path).map_err(|e| ScreenerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Resolve the `[screener]` section. Missing keys fall back to defaults and
/// `today` stands in for an absent `end_date`.
pub fn build_screener_config(
    adapter: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<ScreenerConfig, ScreenerError> {
    validate_screener_config(adapter)?;

    let codes = match adapter.get_non_empty("screener", "codes") {
        Some(raw) => parse_codes(&raw)
            .map_err(|e| ScreenerError::invalid("screener", "codes", e.to_string()))?,
        None => default_basket(),
    };
    let end_date = match adapter.get_non_empty("screener", "end_date") {
        Some(raw) => parse_date(&raw, "end_date")?,
        None => today,
    };
    let lookback_days = adapter.get_int("screener", "lookback_days", DEFAULT_LOOKBACK_DAYS);

    let mut config = ScreenerConfig::with_lookback(codes, end_date, lookback_days)?;
    config.params = OscillatorParams {
        k_window: adapter.get_int("screener", "k_window", DEFAULT_K_WINDOW as i64) as usize,
        d_smooth: adapter.get_int("screener", "d_smooth", DEFAULT_D_SMOOTH as i64) as usize,
    };
    config.policy = match adapter.get_non_empty("screener", "mode") {
        Some(raw) => parse_mode(&raw)?,
        None => SignalPolicy::default(),
    };
    config.workers = adapter.get_int("screener", "workers", DEFAULT_WORKERS) as usize;
    Ok(config)
}

/// One CSV source per configured directory, primary first.
pub fn build_data_port(adapter: &dyn ConfigPort) -> Result<FallbackDataPort, ScreenerError> {
    validate_data_config(adapter)?;

    let mut sources: Vec<Box<dyn DataPort + Send + Sync>> = Vec::new();
    for (dir_key, suffix_key) in [("primary", "primary_suffix"), ("fallback", "fallback_suffix")] {
        if let Some(dir) = adapter.get_non_empty("data", dir_key) {
            let suffix = adapter.get_non_empty("data", suffix_key).unwrap_or_default();
            sources.push(Box::new(CsvAdapter::new(PathBuf::from(dir)).with_suffix(&suffix)));
        }
    }
    Ok(FallbackDataPort::new(sources))
}

/// Command-line flag first, then `[report] format`, then `default`.
pub fn resolve_format(
    flag: Option<&str>,
    adapter: &dyn ConfigPort,
    default: ReportFormat,
) -> Result<ReportFormat, ScreenerError> {
    match flag.map(str::to_string).or_else(|| adapter.get_non_empty("report", "format")) {
        Some(raw) => raw
            .parse()
            .map_err(|reason: String| ScreenerError::invalid("report", "format", reason)),
        None => Ok(default),
    }
}

fn parse_mode(raw: &str) -> Result<SignalPolicy, ScreenerError> {
    raw.parse()
        .map_err(|e: UnknownPolicy| ScreenerError::invalid("screener", "mode", e.to_string()))
}

fn write_output<F>(path: Option<&PathBuf>, write: F) -> Result<(), ScreenerError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), ScreenerError>,
{
    match path {
        Some(p) => {
            let mut file = BufWriter::new(File::create(p)?);
            write(&mut file)?;
            file.flush()?;
            tracing::info!(path = %p.display(), "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}

fn run_screen(
    config_path: &Path,
    mode: Option<&str>,
    format: Option<&str>,
    output: Option<&PathBuf>,
    code_override: Option<&str>,
    today: NaiveDate,
) -> Result<(), ScreenerError> {
    tracing::debug!(path = %config_path.display(), "loading config");
    let adapter = load_config(config_path)?;

    let mut config = build_screener_config(&adapter, today)?;
    if let Some(raw) = mode {
        config.policy = parse_mode(raw)?;
    }
    if let Some(raw) = code_override {
        config.codes = parse_codes(raw)
            .map_err(|e| ScreenerError::invalid("screener", "codes", e.to_string()))?;
    }
    let data_port = build_data_port(&adapter)?;
    let report = resolve_format(format, &adapter, ReportFormat::Table)?.adapter();

    tracing::info!(
        codes = config.codes.len(),
        start = %config.start_date,
        end = %config.end_date,
        policy = %config.policy,
        source = %data_port.name(),
        "screening basket"
    );
    let records = screener::screen_basket(&data_port, &config);

    write_output(output, |out| report.write_signals(&records, out))
}

fn run_chart(
    config_path: &Path,
    code: &str,
    mode: Option<&str>,
    format: Option<&str>,
    output: Option<&PathBuf>,
    today: NaiveDate,
) -> Result<(), ScreenerError> {
    let adapter = load_config(config_path)?;

    let mut config = build_screener_config(&adapter, today)?;
    if let Some(raw) = mode {
        config.policy = parse_mode(raw)?;
    }
    let data_port = build_data_port(&adapter)?;
    // Config [report] format targets the screen table; charts default to CSV.
    let report = match format {
        Some(raw) => raw
            .parse::<ReportFormat>()
            .map_err(|reason| ScreenerError::invalid("report", "format", reason))?,
        None => ReportFormat::Csv,
    }
    .adapter();

    let code = code.trim().to_uppercase();
    let trace = screener::chart_symbol(&data_port, &code, &config)?;
    tracing::info!(
        code = %trace.symbol,
        bars = trace.prices.len(),
        events = trace.events.len(),
        signal = %trace.record.signal,
        "chart ready"
    );

    write_output(output, |out| report.write_chart(&trace, out))
}

/// Check the config and describe what a screen run would do.
pub fn run_validate(config_path: &Path, today: NaiveDate) -> Result<String, ScreenerError> {
    let adapter = load_config(config_path)?;
    let config = build_screener_config(&adapter, today)?;
    let data_port = build_data_port(&adapter)?;
    let format = resolve_format(None, &adapter, ReportFormat::Table)?;
    Ok(describe_config(&config, &data_port, format))
}

pub fn describe_config(
    config: &ScreenerConfig,
    data_port: &dyn DataPort,
    format: ReportFormat,
) -> String {
    let format_name = match format {
        ReportFormat::Table => "table",
        ReportFormat::Csv => "csv",
    };
    let mut out = String::new();
    out.push_str("Configuration is valid.\n");
    out.push_str(&format!(
        "  Basket:     {} codes ({})\n",
        config.codes.len(),
        config.codes.join(", ")
    ));
    out.push_str(&format!(
        "  Window:     {} to {}\n",
        config.start_date, config.end_date
    ));
    out.push_str(&format!("  Oscillator: {}\n", config.params));
    out.push_str(&format!("  Policy:     {}\n", config.policy));
    out.push_str(&format!("  Workers:    {}\n", config.workers));
    out.push_str(&format!("  Sources:    {}\n", data_port.name()));
    out.push_str(&format!("  Report:     {}\n", format_name));
    out
}
