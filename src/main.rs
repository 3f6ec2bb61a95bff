//! Dice Fairness CLI
//!
//! Command-line interface for simulating dice and analysing roll
//! histories for fairness.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use dice_fairness::{
    config::{ConfigError, FileConfig, OutputFormat},
    metrics::{MetricsError, MetricsRegistry, MetricsSnapshot},
    roll::{Die, DieError, FairDie, LoadedDie, SpecError},
    DieSpec, FairnessReport, FairnessSession, TracePoint,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "dice-fairness")]
#[command(author, version, about = "Fairness statistics for repeated die rolls")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file; command-line flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of faces on the die
    #[arg(short = 'd', long, global = true)]
    arity: Option<u32>,

    /// Confidence level for per-side intervals, e.g. 0.95
    #[arg(long, global = true)]
    confidence: Option<f64>,

    /// Output format: table or json
    #[arg(long, global = true)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Roll a simulated die and report on the result
    Simulate {
        /// Number of rolls
        #[arg(short = 'n', long)]
        rolls: Option<usize>,

        /// Seed for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Comma-separated per-face weights for a loaded die
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        /// Also print the report in Prometheus text format
        #[arg(long)]
        metrics: bool,
    },
    /// Analyse a recorded roll history
    Analyze {
        /// Roll outcomes (comma or whitespace separated)
        rolls: Vec<String>,

        /// Read roll outcomes from a file instead
        #[arg(short, long, conflicts_with = "rolls")]
        file: Option<PathBuf>,
    },
    /// Roll continuously until interrupted, summarising periodically
    Watch {
        /// Rolls between summaries
        #[arg(long)]
        every: Option<usize>,

        /// Seed for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Port for the Prometheus endpoint (requires the `metrics` feature)
        #[arg(long)]
        metrics_port: Option<u16>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Die(#[from] DieError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to read rolls: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a roll outcome: {0:?}")]
    BadRoll(String),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Report as exported to JSON.
#[derive(Serialize)]
struct ExportedReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a FairnessReport,
    p_value_trace: &'a [TracePoint],
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    if let Some(arity) = cli.arity {
        config.session.arity = arity;
    }
    if let Some(level) = cli.confidence {
        config.session.confidence_level = level;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    let die = config.session.die()?;
    let confidence = config.session.confidence()?;
    info!("Dice Fairness v{} ({}, {} confidence)", dice_fairness::VERSION, die, confidence);

    let mut session = FairnessSession::with_thresholds(die, confidence, config.thresholds);

    match cli.command {
        Command::Simulate {
            rolls,
            seed,
            weights,
            metrics,
        } => {
            let count = rolls.unwrap_or(config.simulation.rolls);
            let mut source = build_die(
                die,
                seed.or(config.simulation.seed),
                weights.or(config.simulation.weights),
            )?;
            session.record_all(source.roll_many(count));
            info!("Rolled {} {} times", die, count);

            print_report(&mut session, config.output.format)?;
            if metrics {
                let registry = MetricsRegistry::new()?;
                registry.update(&MetricsSnapshot::from_report(&session.report()));
                print!("{}", registry.encode()?);
            }
        }
        Command::Analyze { rolls, file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => rolls.join(" "),
            };
            session.record_all(parse_rolls(&text)?);
            print_report(&mut session, config.output.format)?;
        }
        Command::Watch {
            every,
            seed,
            metrics_port,
        } => {
            let every = every.unwrap_or(config.output.report_every).max(1);
            let port = metrics_port.unwrap_or(config.output.metrics_port);
            let mut source = build_die(
                die,
                seed.or(config.simulation.seed),
                config.simulation.weights,
            )?;
            watch(&mut session, source.as_mut(), every, port)?;
            print_report(&mut session, config.output.format)?;
        }
    }

    Ok(())
}

fn build_die(
    spec: DieSpec,
    seed: Option<u64>,
    weights: Option<Vec<f64>>,
) -> Result<Box<dyn Die>, DieError> {
    let die: Box<dyn Die> = match (weights, seed) {
        (Some(w), Some(seed)) => Box::new(LoadedDie::from_seed(spec, &w, seed)?),
        (Some(w), None) => Box::new(LoadedDie::from_os_entropy(spec, &w)?),
        (None, Some(seed)) => Box::new(FairDie::from_seed(spec, seed)),
        (None, None) => Box::new(FairDie::from_os_entropy(spec)),
    };
    Ok(die)
}

fn parse_rolls(text: &str) -> Result<Vec<i64>, CliError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| CliError::BadRoll(token.to_string()))
        })
        .collect()
}

fn watch(
    session: &mut FairnessSession,
    source: &mut dyn Die,
    every: usize,
    metrics_port: u16,
) -> Result<(), CliError> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let publish = start_metrics(metrics_port)?;
    info!("Rolling continuously, press Ctrl-C to stop");

    while running.load(Ordering::SeqCst) {
        session.record_all(source.roll_many(every));
        let report = session.report();

        let flagged = report.flagged_sides.len();
        if flagged > 0 {
            warn!(
                rolls = report.total_rolls,
                sides = ?report.flagged_sides,
                "{} side(s) individually significant", flagged
            );
        }
        info!(rolls = report.total_rolls, "Verdict: {}", report.verdict);

        publish(&MetricsSnapshot::from_report(&report));
    }

    info!("Stopped after {} rolls", session.history().len());
    Ok(())
}

#[cfg(feature = "metrics")]
fn start_metrics(port: u16) -> Result<Box<dyn Fn(&MetricsSnapshot)>, CliError> {
    use dice_fairness::metrics::{MetricsServer, MetricsServerConfig};

    if port == 0 {
        return Ok(Box::new(|_: &MetricsSnapshot| {}));
    }

    let server = MetricsServer::new(MetricsServerConfig::with_port(port), MetricsRegistry::new()?);
    let state = server.state();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    std::thread::spawn(move || {
        if let Err(e) = runtime.block_on(server.run()) {
            warn!("Metrics server stopped: {}", e);
        }
    });

    Ok(Box::new(move |snapshot: &MetricsSnapshot| {
        state.blocking_read().update(snapshot)
    }))
}

#[cfg(not(feature = "metrics"))]
fn start_metrics(port: u16) -> Result<Box<dyn Fn(&MetricsSnapshot)>, CliError> {
    if port != 0 {
        warn!("Built without the `metrics` feature; ignoring metrics port {}", port);
    }
    Ok(Box::new(|_: &MetricsSnapshot| {}))
}

fn print_report(session: &mut FairnessSession, format: OutputFormat) -> Result<(), CliError> {
    let report = session.report();

    match format {
        OutputFormat::Json => {
            let exported = ExportedReport {
                generated_at: Utc::now(),
                report: &report,
                p_value_trace: session.p_value_trace(),
            };
            println!("{}", serde_json::to_string_pretty(&exported)?);
        }
        OutputFormat::Table => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &FairnessReport) {
    println!(
        "{} rolls of a {} ({} ignored), {} confidence",
        report.total_rolls, report.die, report.ignored_rolls, report.confidence_level
    );
    println!(
        "{:>4} {:>7} {:>9} {:>9} {:>9} {:>21} {:>8} {:>9}",
        "side", "count", "observed", "expected", "std err", "interval", "z", "p"
    );
    for s in &report.sides {
        println!(
            "{:>4} {:>7} {:>9.4} {:>9.4} {:>9.4} {:>10.4}..{:<9.4} {:>8.3} {:>9.4}{}",
            s.side,
            s.count,
            s.observed_probability,
            s.expected_probability,
            s.standard_error,
            s.confidence_interval.lower,
            s.confidence_interval.upper,
            s.z_score,
            s.p_value,
            if report.flagged_sides.contains(&s.side) { " *" } else { "" }
        );
    }

    match &report.goodness_of_fit {
        Some(gof) => println!(
            "chi-squared = {:.4}, df = {}, p = {:.6}",
            gof.chi_squared, gof.degrees_of_freedom, gof.p_value
        ),
        None => println!("chi-squared test skipped: fewer than 5 expected rolls per side"),
    }
    println!("verdict: {}", report.verdict);
}
