//! Market scraper CLI application.

use anyhow::{bail, Context, Result};
use clap::Parser;
use market_scraper::api::{ApiClient, HttpTransport};
use market_scraper::{walker, EventScraper, RecordSettings};
use shared::config::TargetConfig;
use shared::{Config, LogConfig, OutputSink, ScrapeSession, WalkerKind};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write JSON files instead of database rows
    #[arg(long)]
    developer_testing: bool,

    /// Sport/source tag of a single event to scrape (overrides configured targets)
    #[arg(long, requires = "event_id")]
    source_type: Option<String>,

    /// Event id of a single event to scrape
    #[arg(long, requires = "source_type")]
    event_id: Option<u64>,

    /// Listing layout of the single event (direct or competition)
    #[arg(long, default_value = "direct")]
    walker: WalkerKind,
}

impl Args {
    /// Events to scrape: the ad-hoc one from the command line, or the configured list
    fn targets(&self, config: &Config) -> Vec<TargetConfig> {
        match (&self.source_type, self.event_id) {
            (Some(source_type), Some(event_id)) => vec![TargetConfig {
                source_type: source_type.clone(),
                event_id,
                walker: self.walker,
            }],
            _ => config.targets.clone(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.developer_testing || env_flag("DEVELOPER_TESTING") {
        config.output.developer_testing = true;
    }

    // Initialize logging
    let mut log_config = LogConfig::from_settings(&config.logging, &config.log_dir(), "market-scraper");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!("Market scraper starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    let targets = args.targets(&config);
    if targets.is_empty() {
        bail!("No events to scrape: add [[targets]] to the config or pass --source-type and --event-id");
    }

    let mut sink = OutputSink::from_config(&config).context("Failed to initialize output")?;
    info!(output = %sink.describe(), "Output initialized");

    let settings = RecordSettings {
        source: config.source.source_ref(),
        home_link: config.source.home_link.clone(),
        kickoff_offset_hours: config.output.kickoff_offset_hours,
    };

    for target in &targets {
        let transport = HttpTransport::new(&config.api).context("Failed to create HTTP transport")?;
        let api = ApiClient::new(transport, config.api.clone());
        let session = ScrapeSession::start(
            config.source.source_ref(),
            target.source_type.clone(),
            target.event_id,
        );

        let scraper = EventScraper::new(api, &mut sink, settings.clone(), session);
        let summary = walker::run_with(target.walker, scraper).await;
        let stats = &summary.stats;

        info!("=== Scrape Complete ===");
        info!("Event: {} ({})", target.event_id, target.source_type);
        info!("Matches stored: {}", stats.matches_emitted);
        info!("Matches failed: {}", stats.matches_failed);
        info!("Detail groups: {}", stats.detail_groups);
        info!("Detail groups failed: {}", stats.groups_failed);
        info!("Listing failures: {}", stats.listing_failures);
        info!("Duration: {}s", summary.metadata.duration);

        if stats.sink_failures > 0 {
            warn!(failures = stats.sink_failures, "Some records could not be stored");
        }
    }

    info!("Market scraper finished");

    Ok(())
}
