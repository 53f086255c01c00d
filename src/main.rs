mod commands;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::env;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flightboard::config::PipelineConfig;
use flightboard::web::{PgPool, create_pool};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

#[derive(Parser, Debug)]
#[command(
    name = "flightboard",
    about = "Daily ETL for airport departure boards: ingest scraped listings, recompute daily stats, serve them read-only."
)]
struct Cli {
    /// Optional TOML config file overriding the built-in pipeline defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize one scraped batch and commit it to the raw store
    Ingest {
        /// Scrape date the batch was collected for (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Collector output file (.json array or headered .csv)
        #[arg(long)]
        input: PathBuf,
    },
    /// Recompute daily statistics for one date
    Aggregate {
        /// Stat date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Run the read-only query layer for the dashboard
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },
}

fn init_pool() -> Result<PgPool> {
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in the environment")?;
    let pool = create_pool(&database_url)?;

    let mut conn = pool
        .get()
        .context("failed to connect to the database for migrations")?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;
    if !applied.is_empty() {
        info!("Applied {} pending database migrations", applied.len());
    }

    Ok(pool)
}

async fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref())?;
    let pool = init_pool()?;

    match cli.command {
        Command::Ingest { date, input } => {
            commands::handle_ingest(pool, &config, date, &input).await
        }
        Command::Aggregate { date } => {
            let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
            commands::handle_aggregate(pool, date).await
        }
        Command::Serve { listen } => commands::handle_serve(pool, &listen).await,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Exit status is the whole contract with the external scheduler:
    // 0 on success, 1 on any failed run.
    if let Err(e) = run(cli).await {
        error!("Run failed: {:#}", e);
        std::process::exit(1);
    }
}
