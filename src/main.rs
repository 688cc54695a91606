// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2db::api::NotionHttpClient;
use notion2db::config::{MigrateArgs, MigrationConfig};
use notion2db::input::read_identifier_file;
use notion2db::pipeline::{run_batch, MigrationContext, Pacer};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion2db.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = MigrateArgs::parse();

    setup_logging(cli.verbose)?;

    let config = MigrationConfig::resolve(cli)?;
    if config.dry_run {
        log::info!("[DRY-RUN MODE] No write operations will be performed.");
    }

    let page_ids = read_identifier_file(&config.pages_file, config.limit)?;
    if page_ids.is_empty() {
        log::info!("No pages listed in {}.", config.pages_file.display());
        return Ok(());
    }
    log::info!(
        "Found {} page(s) to migrate. Limit={}. Rate_sleep={}",
        page_ids.len(),
        config
            .limit
            .map_or("none".to_string(), |n| n.to_string()),
        config.rate_sleep
    );

    let api: Option<Arc<dyn notion2db::api::NotionApi>> = match &config.api_key {
        Some(key) => Some(Arc::new(NotionHttpClient::new(key)?)),
        None => None,
    };
    let ctx = MigrationContext {
        api,
        pacer: Pacer::from_secs(config.rate_sleep),
        dry_run: config.dry_run,
        target_db: config.target_db.clone(),
    };

    let report = run_batch(&ctx, &page_ids).await;
    println!(
        "Migration complete. Succeeded: {}, Failed: {}",
        report.succeeded, report.failed
    );

    // Job failures are reported above; only startup configuration problems
    // change the exit code.
    Ok(())
}
