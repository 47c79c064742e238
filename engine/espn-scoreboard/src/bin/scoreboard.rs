//! Command-line access to ESPN league scoreboards

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use espn_scoreboard::{logging, League, LeagueId, ScoreboardConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "scoreboard")]
#[command(about = "Fetch ESPN fantasy football scoreboards as JSON")]
#[command(version = "0.1.0")]
struct Cli {
    /// ESPN league id
    league_id: String,

    /// Log level (e.g. info, debug)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log format: text, json or pretty
    #[arg(long, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the league's display name
    Name,

    /// Scoreboard for a single week
    Week {
        /// Season year, defaults to the current year
        #[arg(short, long)]
        season: Option<i32>,

        /// Week number, defaults to the current week
        #[arg(short, long)]
        week: Option<u32>,
    },

    /// Scoreboards for a range of weeks
    Weeks {
        #[arg(long)]
        start: u32,

        #[arg(long)]
        end: u32,

        #[arg(short, long)]
        season: Option<i32>,
    },

    /// Every week of the current season
    Season {
        /// Print standings instead of weekly scoreboards
        #[arg(long)]
        standings: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::initialize_logging_with_config(&cli.log_level, &cli.log_format)?;

    let id = LeagueId::try_from(cli.league_id.as_str())
        .context("league id must be a non-negative integer")?;
    let config = ScoreboardConfig::from_env().context("Failed to load scoreboard configuration")?;
    let league = League::with_config(id, &config)?;

    info!("Using scoreboard endpoint {}", config.scoreboard_url());

    let output = match cli.command {
        Commands::Name => serde_json::to_string_pretty(&league.fetch_name().await?)?,
        Commands::Week { season, week } => {
            serde_json::to_string_pretty(&league.fetch_week(season, week).await?)?
        }
        Commands::Weeks { start, end, season } => {
            serde_json::to_string_pretty(&league.fetch_weeks(start, end, season).await?)?
        }
        Commands::Season { standings } => {
            let season = league.fetch_season().await?;
            if standings {
                serde_json::to_string_pretty(&season.standings())?
            } else {
                serde_json::to_string_pretty(&season)?
            }
        }
    };

    println!("{output}");
    Ok(())
}
