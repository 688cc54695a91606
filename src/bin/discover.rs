// src/bin/discover.rs
//! Builds an identifier list file for the migration pipeline.

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use notion2db::api::NotionHttpClient;
use notion2db::config::{DiscoverArgs, DiscoverConfig, DiscoverTarget};
use notion2db::discover;
use notion2db::pipeline::Pacer;

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .build(Root::builder().appender("stdout").build(log_level))?;

    log4rs::init_config(config)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = DiscoverArgs::parse();

    setup_logging(cli.verbose)?;

    let config = DiscoverConfig::resolve(cli)?;
    let api = NotionHttpClient::new(&config.api_key)?;
    let pacer = Pacer::from_secs(config.rate_sleep);

    let mut page_ids = match &config.target {
        DiscoverTarget::Parent { id, recursive } => {
            log::info!(
                "Collecting child pages under parent {id} (recursive={recursive})..."
            );
            discover::child_pages_under(&api, &pacer, id, *recursive).await?
        }
        DiscoverTarget::Database { id } => {
            log::info!("Querying database {id} for pages...");
            discover::database_rows(&api, &pacer, id).await?
        }
        DiscoverTarget::Search { query } => {
            log::info!("Running workspace search for: {query:?} ...");
            discover::search_matches(&api, &pacer, query, config.limit).await?
        }
    };

    if let Some(limit) = config.limit {
        page_ids.truncate(limit);
    }

    log::info!(
        "Found {} page(s). Writing to {} ...",
        page_ids.len(),
        config.output.display()
    );
    discover::write_id_file(&config.output, &page_ids)?;
    log::info!("Done.");
    Ok(())
}
