use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use clock_core::{AttendanceRecord, Window};
use tracing_subscriber::EnvFilter;

use clock_cli::commands::double_time::Output;
use clock_cli::commands::util::{load_records, minutes_to_duration, parse_datetime};
use clock_cli::commands::{day, double_time, spans, week, weeks};
use clock_cli::{Cli, Commands, Config};

/// Load config and the attendance records it (or `--records`) points at.
fn open_records(cli: &Cli) -> Result<(Vec<AttendanceRecord>, Config)> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let path: PathBuf = cli
        .records
        .clone()
        .unwrap_or_else(|| config.records_path.clone());
    let records = load_records(&path)?;
    Ok((records, config))
}

fn resolve_now(cli: &Cli) -> Result<NaiveDateTime> {
    let wall_clock = Local::now().naive_local();
    match &cli.now {
        Some(s) => parse_datetime(s, wall_clock).context("invalid --now"),
        None => Ok(wall_clock),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Day { date, json }) => {
            let (records, _config) = open_records(&cli)?;
            let now = resolve_now(&cli)?;
            let date = date.as_deref().map(|d| parse_datetime(d, now)).transpose()?;
            day::run(&mut stdout, &records, now, date.unwrap_or(now), *json)?;
        }
        Some(Commands::Week { date, all, json }) => {
            let (records, _config) = open_records(&cli)?;
            let now = resolve_now(&cli)?;
            if *all {
                week::run_all(&mut stdout, &records, now, *json)?;
            } else {
                let date = date.as_deref().map(|d| parse_datetime(d, now)).transpose()?;
                week::run(&mut stdout, &records, now, date.unwrap_or(now), *json)?;
            }
        }
        Some(Commands::Weeks { json }) => {
            let (records, _config) = open_records(&cli)?;
            weeks::run(&mut stdout, &records, *json)?;
        }
        Some(Commands::DoubleTime {
            from,
            to,
            min_minutes,
            json,
            emit_records,
        }) => {
            let (records, config) = open_records(&cli)?;
            let now = resolve_now(&cli)?;
            let window = Window::new(parse_datetime(from, now)?, parse_datetime(to, now)?);
            let min_total =
                minutes_to_duration(min_minutes.unwrap_or(config.double_time_min_minutes))
                    .context("invalid double-time minimum")?;
            let output = if *emit_records {
                Output::Records
            } else if *json {
                Output::Json
            } else {
                Output::Text
            };
            double_time::run(&mut stdout, &records, window, min_total, output)?;
        }
        Some(Commands::Spans {
            subject,
            from,
            to,
            clip,
            json,
        }) => {
            let (records, _config) = open_records(&cli)?;
            let now = resolve_now(&cli)?;
            let window = match (from, to) {
                (Some(from), Some(to)) => Some(Window::new(
                    parse_datetime(from, now)?,
                    parse_datetime(to, now)?,
                )),
                _ => None,
            };
            spans::run(&mut stdout, &records, now, subject, window, *clip, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
