// src/config.rs
//! Command-line surface and resolved run configuration.
//!
//! Resolution order for credentials and the target database is CLI
//! argument first, then environment variable. Validation happens here, at
//! startup, so the pipeline never sees a half-configured run.

use crate::constants::{DEFAULT_RATE_SLEEP_SECS, DISCOVER_RATE_SLEEP_SECS};
use crate::error::AppError;
use crate::types::{ApiKey, NotionId};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Migrate Notion pages and their block trees into rows of a target
/// Notion database.
#[derive(Parser, Debug)]
#[command(name = "notion2db", version, about)]
pub struct MigrateArgs {
    /// Path to a file with Notion page URLs or IDs, one per line
    #[arg(short = 'f', long, default_value = "pages.txt")]
    pub pages_file: PathBuf,

    /// Notion integration token (falls back to NOTION_TOKEN)
    #[arg(short = 't', long)]
    pub notion_token: Option<String>,

    /// Target Notion database id (falls back to TARGET_DB_ID)
    #[arg(short = 'd', long)]
    pub target_db_id: Option<String>,

    /// Seconds to sleep between API calls (falls back to RATE_SLEEP)
    #[arg(short = 'r', long)]
    pub rate_sleep: Option<f64>,

    /// Simulate create/append steps without writing to Notion
    #[arg(long)]
    pub dry_run: bool,

    /// Limit the number of pages to process
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Fully resolved migration configuration.
#[derive(Debug)]
pub struct MigrationConfig {
    pub pages_file: PathBuf,
    pub api_key: Option<ApiKey>,
    pub target_db: Option<NotionId>,
    pub rate_sleep: f64,
    pub dry_run: bool,
    pub limit: Option<usize>,
    pub verbose: bool,
}

impl MigrationConfig {
    pub fn resolve(args: MigrateArgs) -> Result<Self, AppError> {
        let token = args.notion_token.or_else(|| env_var("NOTION_TOKEN"));
        let db = args.target_db_id.or_else(|| env_var("TARGET_DB_ID"));
        let rate_sleep = validated_rate_sleep(
            args.rate_sleep
                .or_else(|| env_var("RATE_SLEEP").and_then(|raw| raw.parse().ok()))
                .unwrap_or(DEFAULT_RATE_SLEEP_SECS),
        )?;

        if !args.dry_run {
            if token.is_none() {
                return Err(AppError::MissingConfiguration(
                    "NOTION_TOKEN is required unless running with --dry-run".to_string(),
                ));
            }
            if db.is_none() {
                return Err(AppError::MissingConfiguration(
                    "TARGET_DB_ID is required unless running with --dry-run".to_string(),
                ));
            }
        }

        let api_key = token.map(ApiKey::new).transpose()?;
        let target_db = db.as_deref().map(NotionId::parse).transpose()?;

        Ok(Self {
            pages_file: args.pages_file,
            api_key,
            target_db,
            rate_sleep,
            dry_run: args.dry_run,
            limit: args.limit,
            verbose: args.verbose,
        })
    }
}

/// Discovery strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiscoverMode {
    /// Collect child pages under a parent page
    Parent,
    /// List the pages inside a database
    Database,
    /// Search the workspace for matching pages
    Search,
}

/// Build an identifier list file for the migration pipeline.
#[derive(Parser, Debug)]
#[command(name = "notion2db-discover", version, about)]
pub struct DiscoverArgs {
    /// Discovery strategy
    #[arg(short, long, value_enum)]
    pub mode: DiscoverMode,

    /// Parent page id or URL (mode=parent)
    #[arg(short = 'p', long)]
    pub parent_id: Option<String>,

    /// Database id or URL (mode=database)
    #[arg(short = 'd', long)]
    pub database_id: Option<String>,

    /// Search query (mode=search)
    #[arg(short = 'q', long)]
    pub query: Option<String>,

    /// Output file, one page id per line
    #[arg(short = 'o', long, default_value = "pages.txt")]
    pub output: PathBuf,

    /// Notion integration token (falls back to NOTION_TOKEN)
    #[arg(short = 't', long)]
    pub notion_token: Option<String>,

    /// Do not recurse into child blocks when walking a parent page
    #[arg(long)]
    pub no_recursive: bool,

    /// Seconds to sleep between API calls
    #[arg(long)]
    pub rate_sleep: Option<f64>,

    /// Maximum number of pages to collect
    #[arg(long)]
    pub limit: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the discovery utility actually runs with.
#[derive(Debug)]
pub enum DiscoverTarget {
    Parent { id: NotionId, recursive: bool },
    Database { id: NotionId },
    Search { query: String },
}

#[derive(Debug)]
pub struct DiscoverConfig {
    pub api_key: ApiKey,
    pub target: DiscoverTarget,
    pub output: PathBuf,
    pub rate_sleep: f64,
    pub limit: Option<usize>,
    pub verbose: bool,
}

impl DiscoverConfig {
    pub fn resolve(args: DiscoverArgs) -> Result<Self, AppError> {
        let token = args
            .notion_token
            .or_else(|| env_var("NOTION_TOKEN"))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "NOTION_TOKEN is required; invite the integration to the source pages first"
                        .to_string(),
                )
            })?;

        let target = match args.mode {
            DiscoverMode::Parent => DiscoverTarget::Parent {
                id: required_id(args.parent_id, "--parent-id is required for mode=parent")?,
                recursive: !args.no_recursive,
            },
            DiscoverMode::Database => DiscoverTarget::Database {
                id: required_id(args.database_id, "--database-id is required for mode=database")?,
            },
            DiscoverMode::Search => DiscoverTarget::Search {
                query: args.query.ok_or_else(|| {
                    AppError::MissingConfiguration(
                        "--query is required for mode=search".to_string(),
                    )
                })?,
            },
        };

        Ok(Self {
            api_key: ApiKey::new(token)?,
            target,
            output: args.output,
            rate_sleep: validated_rate_sleep(
                args.rate_sleep.unwrap_or(DISCOVER_RATE_SLEEP_SECS),
            )?,
            limit: args.limit,
            verbose: args.verbose,
        })
    }
}

fn required_id(value: Option<String>, message: &str) -> Result<NotionId, AppError> {
    let raw = value.ok_or_else(|| AppError::MissingConfiguration(message.to_string()))?;
    Ok(NotionId::parse(&raw)?)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// The pacing delay feeds `Duration::from_secs_f64`, which panics on
/// negative or non-finite input, so those are rejected here at startup.
fn validated_rate_sleep(value: f64) -> Result<f64, AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::MissingConfiguration(format!(
            "rate sleep must be a non-negative number of seconds, got {value}"
        )));
    }
    Ok(value)
}
