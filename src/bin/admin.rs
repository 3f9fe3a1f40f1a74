//! CLI administration tool for shortify.
//!
//! Inspects links, statistics and the database without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the 20 most recent links
//! cargo run --bin admin -- links list --limit 20
//!
//! # Show one link
//! cargo run --bin admin -- links show abc123
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use shortify::domain::entities::Link;
use shortify::domain::repositories::LinkRepository;
use shortify::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortify.
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
    /// Inspect short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link inspection subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List {
        /// Maximum number of links to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Show a single link by short code
    Show {
        /// Short code to look up
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link inspection commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match action {
        LinkAction::List { limit } => list_links(&repo, limit).await,
        LinkAction::Show { code } => show_link(&repo, &code).await,
    }
}

/// Lists links with click counts and expiry status.
///
/// # Output Format
///
/// ```text
/// Links
///
///   Code       Clicks   Created            Status   URL
///   ──────────────────────────────────────────────────────────────
///   abc123     12       2024-01-15 10:30   ACTIVE   https://example.com
/// ```
async fn list_links(repo: &PgLinkRepository, limit: usize) -> Result<()> {
    println!("{}", "Links".bright_blue().bold());
    println!();

    let links = repo
        .list_all()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<10} {:<8} {:<18} {:<8} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in links.iter().take(limit) {
        println!(
            "  {:<10} {:<8} {:<18} {:<8} {}",
            link.short_code.cyan(),
            link.click_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status_label(link),
            link.original_url
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        links.len().min(limit).to_string().bright_white().bold(),
        links.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_link(repo: &PgLinkRepository, code: &str) -> Result<()> {
    let link = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Link '{code}' not found"))?;

    println!("{}", "Link".bright_blue().bold());
    println!();
    println!("  Code:     {}", link.short_code.cyan());
    println!("  URL:      {}", link.original_url);
    println!("  Clicks:   {}", link.click_count.to_string().bright_green());
    println!(
        "  Created:  {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match link.expires_at {
        Some(at) => println!("  Expires:  {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Expires:  {}", "never".bright_black()),
    }
    println!("  Status:   {}", status_label(&link));
    println!();

    Ok(())
}

fn status_label(link: &Link) -> ColoredString {
    if link.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    }
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Total number of clicks
/// - Number of expired links
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM urls")
            .fetch_one(pool)
            .await?;

    let expired_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM urls WHERE expires_at IS NOT NULL AND expires_at < NOW()",
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired links: {}",
        expired_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
