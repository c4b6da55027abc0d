use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use swipe_deck::config::{LoggingSettings, Settings};
use swipe_deck::services::{load_script, replay, JsonFileProvider};
use swipe_deck::CardStack;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Replay a scripted swipe session against a deck and print the JSON report
#[derive(Debug, Parser)]
#[command(name = "swipe-deck", version, about)]
struct Cli {
    /// JSON array of candidates
    #[arg(long)]
    candidates: PathBuf,

    /// JSON array of session steps
    #[arg(long)]
    script: PathBuf,

    /// Reference width; overrides deck.reference_width from configuration
    #[arg(long)]
    width: Option<f64>,

    /// Configuration file; defaults to config/default.toml and config/local.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "json" => subscriber.json().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.pretty().init(),
    }
}

fn run(cli: Cli, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let thresholds = settings.motion.thresholds()?;
    let reference_width = cli.width.unwrap_or(settings.deck.reference_width);

    let provider = JsonFileProvider::new(&cli.candidates);
    let mut stack = CardStack::from_provider(&provider, reference_width, thresholds)?;
    info!(cards = stack.deck().len(), reference_width, "deck ready");

    let steps = load_script(&cli.script)?;
    info!(steps = steps.len(), "replaying session");

    let report = replay(&mut stack, &steps);
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(final_index = report.final_index, exhausted = report.exhausted, "session complete");
    Ok(())
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging);
    info!("Starting swipe-deck session replay...");

    match run(cli, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Session replay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
