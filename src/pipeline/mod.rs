// src/pipeline/mod.rs
//! The migration pipeline: fetch, infer metadata, create the destination
//! row, convert, re-insert, orchestrated per source identifier.

pub mod create;
pub mod fetch;
pub mod insert;
pub mod metadata;

use crate::api::NotionApi;
use crate::convert::convert_block;
use crate::error::AppError;
use crate::types::NotionId;
use chrono::Utc;
use log::info;
use std::sync::Arc;
use std::time::Duration;

pub use create::NewPage;
pub use metadata::PageMetadata;

/// Fixed inter-call pacing.
///
/// One shared value for the whole run, applied between API-issuing
/// operations. Deliberately not adaptive; the delay is chosen to stay
/// under the service's rate limit for strictly sequential calls.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_secs(secs: f64) -> Self {
        Self::new(Duration::from_secs_f64(secs))
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Everything a migration run needs, constructed once at startup.
///
/// `api` is absent only for credential-less dry runs, where every step
/// that would touch the service is simulated instead.
pub struct MigrationContext {
    pub api: Option<Arc<dyn NotionApi>>,
    pub pacer: Pacer,
    pub dry_run: bool,
    pub target_db: Option<NotionId>,
}

impl MigrationContext {
    pub(crate) fn api(&self) -> Result<&dyn NotionApi, AppError> {
        self.api.as_deref().ok_or_else(missing_client)
    }
}

fn missing_client() -> AppError {
    AppError::MissingConfiguration(
        "a Notion API token is required outside dry-run mode".to_string(),
    )
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<(NotionId, String)>,
}

/// Migrate one source page end to end.
///
/// Sequence: fetch the block tree, infer title and date, create the
/// destination row, convert, re-insert. Every error propagates to the
/// caller; per-job recovery lives in [`run_batch`].
pub async fn migrate_page(ctx: &MigrationContext, source: &NotionId) -> Result<(), AppError> {
    info!("Starting migration for {source}");

    let children = match &ctx.api {
        Some(api) => {
            let children = fetch::fetch_block_tree(api.as_ref(), &ctx.pacer, source).await?;
            ctx.pacer.pause().await;
            children
        }
        None if ctx.dry_run => {
            info!("[DRY-RUN] No client available: skipping block fetch (simulation)");
            Vec::new()
        }
        None => return Err(missing_client()),
    };

    let metadata = match &ctx.api {
        Some(api) => metadata::infer_title_and_date(api.as_ref(), source).await?,
        None => PageMetadata {
            title: format!("Simulated title for {}", source.short()),
            date: Some(Utc::now().format("%Y-%m-%d").to_string()),
        },
    };
    let title = metadata.title;
    let date = metadata
        .date
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());
    info!("Resolved title {title:?}, date {date}");

    let page = create::create_destination_page(ctx, &title, &date).await?;
    info!("Destination page ready: {page}");

    let converted: Vec<_> = children.iter().map(convert_block).collect();
    insert::insert_blocks(ctx, &page, &converted).await?;
    info!("Appended {} top-level blocks to {page}", converted.len());
    Ok(())
}

/// Drive the pipeline across a batch of source identifiers.
///
/// Jobs are independent: a failure is recorded with its cause and the
/// batch moves on. No retry, no rollback of partially inserted content.
pub async fn run_batch(ctx: &MigrationContext, sources: &[NotionId]) -> BatchReport {
    let mut report = BatchReport::default();
    let total = sources.len();

    for (idx, source) in sources.iter().enumerate() {
        info!("[{}/{total}] Migrating {source}", idx + 1);
        match migrate_page(ctx, source).await {
            Ok(()) => report.succeeded += 1,
            Err(err) => {
                eprintln!("ERROR migrating {source}: {err}");
                log::error!("migration of {source} failed: {err}");
                report.failed += 1;
                report.failures.push((source.clone(), err.to_string()));
            }
        }
        ctx.pacer.pause().await;
    }

    report
}
