// src/pipeline/fetch.rs
//! Recursive block tree retrieval.

use crate::api::pagination::drain_cursor;
use crate::api::NotionApi;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;
use log::{debug, info};
use std::future::Future;
use std::pin::Pin;

use super::Pacer;

/// Fetch the full subtree under `root`, depth-first.
///
/// Children arrive in pages of up to 100, drained cursor by cursor with a
/// pacing pause before each follow-up page. A child that reports
/// descendants of its own is expanded in place before the sequence is
/// returned, so the caller always receives a fully materialized tree. Any
/// transport error aborts the whole subtree fetch.
pub fn fetch_block_tree<'a>(
    api: &'a dyn NotionApi,
    pacer: &'a Pacer,
    root: &'a NotionId,
) -> Pin<Box<dyn Future<Output = Result<Vec<Block>, AppError>> + Send + 'a>> {
    Box::pin(async move {
        let mut batch = 0u32;
        let fetched = drain_cursor(pacer, None, |cursor| {
            batch += 1;
            info!("Fetching blocks batch {batch} for {}...", root.short());
            api.list_children(root, cursor, NOTION_API_PAGE_SIZE)
        })
        .await?;

        let mut expanded = Vec::with_capacity(fetched.len());
        for block in fetched {
            if block.has_children() {
                debug!("recursing into block {}", block.id().short());
                let children = fetch_block_tree(api, pacer, block.id()).await?;
                expanded.push(block.with_children(children));
            } else {
                expanded.push(block);
            }
        }

        info!("Total blocks fetched under {}: {}", root.short(), expanded.len());
        Ok(expanded)
    })
}
