mod file_store;
mod reports;
mod simulation;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use dicebox_core::MemoryStore;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use file_store::JsonFileStore;
use simulation::{SimulationConfig, SimulationReport, check_invariants, run_simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored console summary
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "dicebox-tester", version = "0.1.0")]
#[command(about = "Simulate days of Dicebox play and check streak and history invariants")]
struct Args {
    /// Number of calendar days to simulate
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Rolls made on each simulated day; the first is the daily bonus roll
    #[arg(long, default_value_t = 3)]
    rolls_per_day: u32,

    /// RNG seed for the dice
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// First simulated day (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,

    /// JSON file to persist state in; in-memory when omitted
    #[arg(long)]
    store: Option<PathBuf>,

    /// Claim rewards as soon as they become available
    #[arg(long)]
    auto_claim: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Text && args.output.is_none() {
        announce_banner();
    }

    let config = SimulationConfig {
        days: args.days,
        rolls_per_day: args.rolls_per_day,
        seed: args.seed,
        start_date: args
            .start_date
            .unwrap_or_else(|| Local::now().date_naive()),
        auto_claim: args.auto_claim,
    };

    let report = match &args.store {
        Some(path) => {
            let store = JsonFileStore::open(path)
                .with_context(|| format!("failed to open store {}", path.display()))?;
            log::info!("persisting to {}", store.path().display());
            run_simulation(&config, store)
        }
        None => run_simulation(&config, MemoryStore::new()),
    };
    let violations = check_invariants(&report);

    write_report(&args, &report, &violations)?;

    if !violations.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "🎲 Dicebox Streak Simulator".bright_cyan().bold());
    println!("{}", "===========================".cyan());
}

fn write_report(args: &Args, report: &SimulationReport, violations: &[String]) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, report, violations)?,
        ReportFormat::Text => reports::generate_console_report(
            &mut output_target,
            report,
            violations,
            args.verbose,
        )?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
