//! CLI administration tool for tinylink.
//!
//! Provides commands for inspecting the shortcode encoder, the store and the
//! ID counter without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Encode a counter value with the configured encoder
//! cargo run --bin admin -- codec encode 42
//!
//! # Decode a shortcode back to its counter value
//! cargo run --bin admin -- codec decode aB3xY9k
//!
//! # Look up a shortcode in the store
//! cargo run --bin admin -- lookup aB3xY9k
//!
//! # Show the current counter value
//! cargo run --bin admin -- counter show
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `tinylink::config`). The whole configuration is
//! validated before any command runs, even though `codec` only uses the
//! `ENCODER_*` settings.

use tinylink::config::{self, Config, mask_connection_string};
use tinylink::domain::repositories::UrlRepository;
use tinylink::infrastructure::connection;
use tinylink::infrastructure::counter::RedisCounter;
use tinylink::infrastructure::persistence::PgUrlRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Run the configured shortcode encoder
    Codec {
        #[command(subcommand)]
        action: CodecAction,
    },

    /// Show the record stored under a shortcode
    Lookup {
        /// Shortcode to look up
        shortcode: String,
    },

    /// Inspect the ID counter
    Counter {
        #[command(subcommand)]
        action: CounterAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CodecAction {
    /// Encode a counter value into a shortcode
    Encode {
        /// Non-negative counter value
        id: u64,
    },

    /// Decode a shortcode into its counter value
    Decode {
        /// Shortcode produced by the same encoder settings
        shortcode: String,
    },
}

#[derive(Subcommand)]
enum CounterAction {
    /// Print the last issued value without incrementing
    Show,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and count stored records
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Codec { action } => handle_codec_action(action, &config)?,
        Commands::Lookup { shortcode } => handle_lookup(&shortcode, &config).await?,
        Commands::Counter { action } => handle_counter_action(action, &config).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

/// Runs the encoder built from `ENCODER_*` settings.
fn handle_codec_action(action: CodecAction, config: &Config) -> Result<()> {
    let encoder = config.build_encoder()?;

    if config.encoder_salt.is_empty() {
        println!("{}", "⚠️  ENCODER_SALT is empty".yellow());
    }

    match action {
        CodecAction::Encode { id } => {
            let shortcode = encoder.encode(id);
            println!("  {} → {}", id.to_string().bright_white(), shortcode.cyan().bold());
        }
        CodecAction::Decode { shortcode } => {
            let id = encoder
                .decode(&shortcode)
                .with_context(|| format!("Cannot decode '{shortcode}'"))?;
            println!("  {} → {}", shortcode.cyan(), id.to_string().bright_white().bold());
        }
    }

    Ok(())
}

async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPool::connect(&config.database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&config.database_url)
            )
        })
}

/// Reads a record straight from the store, bypassing the cache.
async fn handle_lookup(shortcode: &str, config: &Config) -> Result<()> {
    let pool = connect_pool(config).await?;
    let repo = PgUrlRepository::new(Arc::new(pool));

    println!("{}", "🔎 Lookup".bright_blue().bold());
    println!();

    let record = repo
        .find_by_code(shortcode)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    match record {
        Some(record) => {
            println!("  Shortcode: {}", record.shortcode.cyan());
            println!("  Long URL:  {}", record.long_url.bright_white());
            println!(
                "  Created:   {}",
                record
                    .created_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
        }
        None => {
            println!("{}", format!("  No record for '{shortcode}'").yellow());
        }
    }
    println!();

    Ok(())
}

async fn handle_counter_action(action: CounterAction, config: &Config) -> Result<()> {
    match action {
        CounterAction::Show => {
            let manager = connection::connect(&config.redis_url)
                .await
                .context("Failed to connect to Redis")?;
            let counter = RedisCounter::new(manager, config.counter_key.as_str());

            let value = counter
                .current()
                .await
                .map_err(|e| anyhow::anyhow!("Redis error: {}", e))?;

            println!("{}", "🔢 ID Counter".bright_blue().bold());
            println!();
            println!("  Key:   {}", counter.key().cyan());
            println!("  Value: {}", value.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let pool = connect_pool(config).await?;
            let repo = PgUrlRepository::new(Arc::new(pool));

            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
            println!("{}", "✅ Database connection OK".green().bold());

            let count = repo
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
            println!("  Records: {}", count.to_string().bright_green().bold());
        }
    }

    Ok(())
}
