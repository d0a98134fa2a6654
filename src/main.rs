// src/main.rs

//! jobpress: job-feed publisher CLI
//!
//! Fetches the job feed once, renders the regional artifacts and commits
//! them to the output targets. With `--dry-run` the fetch and render still
//! happen but nothing on disk is touched.

use clap::Parser;

use jobpress::config::Config;
use jobpress::error::Result;
use jobpress::pipeline::run_publish;

#[derive(Parser, Debug)]
#[command(
    name = "jobpress",
    version = "0.1.0",
    about = "Fetches a job-posting feed and publishes regional markdown/JSON artifacts"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "jobpress.toml")]
    config: String,

    /// Fetch and render, but report intended writes instead of performing them
    #[arg(long)]
    dry_run: bool,

    /// Override the configured lookback window, in hours
    #[arg(long)]
    lookback: Option<u32>,

    /// Reduce log output to warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (mut config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env_overrides();
    if let Some(hours) = cli.lookback {
        config.api.lookback_hours = hours;
    }

    let level = if cli.quiet {
        "warn"
    } else {
        config.logging.level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(e) = load_error {
        log::warn!(
            "Config load failed from {}: {e}. Using defaults.",
            cli.config
        );
    }

    if let Err(e) = run(&config, cli.dry_run).await {
        log::error!("Publish failed: {e}");
        std::process::exit(1);
    }
}

async fn run(config: &Config, dry_run: bool) -> Result<()> {
    config.validate()?;
    run_publish(config, dry_run).await
}
