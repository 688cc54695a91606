// src/pipeline/insert.rs
//! Tree re-insertion under the destination page.
//!
//! The destination assigns fresh identifiers, so a child cannot be inserted
//! until its parent's append has returned. Blocks therefore go in one at a
//! time, in source order, recursing under the identifier each append
//! reports.

use crate::api::NotionApi;
use crate::convert::{count_blocks, ConvertedBlock};
use crate::error::AppError;
use crate::types::NotionId;
use log::info;
use std::future::Future;
use std::pin::Pin;

use super::{MigrationContext, NewPage, Pacer};

/// Append a converted forest under the new page.
///
/// Dry-run performs no network effect at all; it reports the top-level and
/// recursive block counts that a live run would have appended.
pub async fn insert_blocks(
    ctx: &MigrationContext,
    page: &NewPage,
    blocks: &[ConvertedBlock],
) -> Result<(), AppError> {
    if ctx.dry_run {
        info!(
            "[DRY-RUN] Would append {} top-level block(s) to page {page}",
            blocks.len()
        );
        info!(
            "[DRY-RUN] Total blocks including nested: {}",
            count_blocks(blocks)
        );
        return Ok(());
    }

    let api = ctx.api()?;
    match page.live_id() {
        Some(parent) => append_under(api, &ctx.pacer, parent, blocks).await,
        None => Ok(()),
    }
}

fn append_under<'a>(
    api: &'a dyn NotionApi,
    pacer: &'a Pacer,
    parent: &'a NotionId,
    blocks: &'a [ConvertedBlock],
) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>> {
    Box::pin(async move {
        for block in blocks {
            let assigned = api.append_block(parent, block.to_request_json()).await?;
            pacer.pause().await;

            if !block.children.is_empty() {
                // The append API echoes the new identifiers in order; the
                // last one belongs to the block just sent.
                if let Some(new_parent) = assigned.last() {
                    append_under(api, pacer, new_parent, &block.children).await?;
                }
            }
        }
        Ok(())
    })
}
