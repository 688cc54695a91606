// src/pipeline/metadata.rs
//! Title and date inference for a source page.

use crate::api::NotionApi;
use crate::constants::TITLE_SCAN_PAGE_SIZE;
use crate::error::AppError;
use crate::model::Block;
use crate::types::{plain_text_of, NotionId};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("date regex is valid");
}

/// What the inferrer resolves for one page. A `None` date means neither the
/// title nor the creation timestamp yielded one; the orchestrator
/// substitutes the current date.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub date: Option<String>,
}

/// Derive a human-meaningful title and an ISO date for `page`.
///
/// Title resolution order: the page's title property, then the first
/// non-empty heading or paragraph among its leading child blocks, then a
/// synthesized fallback from the identifier. The date comes from a
/// `YYYY-MM-DD` substring of the resolved title if present, else the
/// creation timestamp's date portion.
pub async fn infer_title_and_date(
    api: &dyn NotionApi,
    page: &NotionId,
) -> Result<PageMetadata, AppError> {
    debug!("retrieving metadata for page {}", page.short());
    let source = api.retrieve_page(page).await?;

    let mut title = source.title_text();

    if title.is_none() {
        let children = api
            .list_children(page, None, TITLE_SCAN_PAGE_SIZE)
            .await?
            .results;
        title = children.iter().find_map(heading_or_paragraph_text);
    }

    let mut date = title
        .as_deref()
        .and_then(|title| DATE_RE.find(title))
        .map(|found| found.as_str().to_string());
    if date.is_none() {
        date = source
            .created_time
            .map(|created| created.format("%Y-%m-%d").to_string());
    }

    Ok(PageMetadata {
        title: title.unwrap_or_else(|| format!("Imported page {}", page.short())),
        date,
    })
}

fn heading_or_paragraph_text(block: &Block) -> Option<String> {
    let content = match block {
        Block::Heading1(b) | Block::Heading2(b) | Block::Heading3(b) => &b.content,
        Block::Paragraph(b) => &b.content,
        _ => return None,
    };
    let text = plain_text_of(&content.rich_text).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
