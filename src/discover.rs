// src/discover.rs
//! Discovery strategies: enumerate candidate source pages by walking a
//! parent page's descendants, querying a database, or searching the
//! workspace.

use crate::api::pagination::drain_cursor;
use crate::api::NotionApi;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use crate::model::Block;
use crate::pipeline::Pacer;
use crate::types::NotionId;
use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;

/// Collect page identifiers for `child_page` blocks under `parent`.
///
/// With `recursive` set, any block reporting children of its own is walked
/// too, so nested pages at any depth are found. Blocks are visited at most
/// once even if the tree links back on itself.
pub async fn child_pages_under(
    api: &dyn NotionApi,
    pacer: &Pacer,
    parent: &NotionId,
    recursive: bool,
) -> Result<Vec<NotionId>, AppError> {
    let mut collected = Vec::new();
    let mut stack = vec![parent.clone()];
    let mut visited: HashSet<NotionId> = HashSet::new();

    while let Some(block_id) = stack.pop() {
        debug!("walking children of {}", block_id.short());
        let children = drain_cursor(pacer, None, |cursor| {
            api.list_children(&block_id, cursor, NOTION_API_PAGE_SIZE)
        })
        .await?;

        for block in children {
            if !visited.insert(block.id().clone()) {
                continue;
            }
            if let Block::ChildPage(_) = block {
                // A child_page block's identifier is the page's identifier.
                collected.push(block.id().clone());
            }
            if recursive && block.has_children() {
                stack.push(block.id().clone());
            }
        }
    }

    Ok(dedupe_preserving_order(collected))
}

/// Identifiers of every row in a database.
pub async fn database_rows(
    api: &dyn NotionApi,
    pacer: &Pacer,
    database: &NotionId,
) -> Result<Vec<NotionId>, AppError> {
    drain_cursor(pacer, None, |cursor| api.query_rows(database, cursor)).await
}

/// Identifiers of pages matching a full-text search, up to `limit`.
pub async fn search_matches(
    api: &dyn NotionApi,
    pacer: &Pacer,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<NotionId>, AppError> {
    drain_cursor(pacer, limit, |cursor| api.search_pages(query, cursor)).await
}

/// Write one dashed identifier per line.
pub fn write_id_file(path: &Path, ids: &[NotionId]) -> Result<(), AppError> {
    let mut out = String::new();
    for id in ids {
        out.push_str(&id.to_hyphenated());
        out.push('\n');
    }
    std::fs::write(path, out)?;
    info!("wrote {} identifier(s) to {}", ids.len(), path.display());
    Ok(())
}

fn dedupe_preserving_order(ids: Vec<NotionId>) -> Vec<NotionId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
