mod config;
mod game_runner;
mod score_client;
mod state;
mod ui;

use std::time::Duration;

use clap::Parser;
use common::{log, logger};

use score_client::{DEFAULT_TOP_LIMIT, ScoreClient};

#[derive(Parser)]
#[command(name = "snake_arcade")]
struct Args {
    /// Path to the YAML config file
    #[arg(long)]
    config: Option<String>,

    /// Print the top-N scoreboard and exit
    #[arg(long)]
    top: Option<u32>,

    /// Seed for the game RNG (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("SnakeArcade".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = config::load(args.config.as_deref())?;
    let score_client = ScoreClient::new(
        &config.server.base_url,
        Duration::from_millis(config.server.request_timeout_ms),
    )?;

    if let Some(limit) = args.top {
        let limit = if limit == 0 { DEFAULT_TOP_LIMIT } else { limit };
        let records = score_client.fetch_top(limit).await?;
        ui::print_scoreboard(&records);
        return Ok(());
    }

    if let Err(message) = score_client.health().await {
        log!("Score service unavailable: {}", message);
    }

    ui::run(&config, &score_client, args.seed).await?;
    Ok(())
}
