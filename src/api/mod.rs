// src/api/mod.rs
//! Notion API interaction — every operation the migration needs, behind one
//! trait so business logic depends on capabilities, never on HTTP details.

pub mod client;
pub mod pagination;
pub mod parser;
pub(crate) mod responses;

use crate::error::AppError;
use crate::model::{Block, DatabaseSchema, SourcePage};
use crate::types::NotionId;

/// One page of results from a cursor-paginated endpoint.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Paginated<T> {
    /// A single page holding everything — what in-memory fakes return.
    pub fn complete(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }
}

/// The ability to read from and write to a Notion workspace.
///
/// The fundamental algebra for the pipeline: fetcher, metadata inferrer,
/// creator, re-inserter and the discovery strategies are all written
/// against this trait. Tests implement it in memory.
#[async_trait::async_trait]
pub trait NotionApi: Send + Sync {
    /// Retrieve a page's attributes and creation timestamp.
    async fn retrieve_page(&self, id: &NotionId) -> Result<SourcePage, AppError>;

    /// List one page of a block's direct children.
    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<Paginated<Block>, AppError>;

    /// Retrieve a database's display title and attribute schema.
    async fn retrieve_database(&self, id: &NotionId) -> Result<DatabaseSchema, AppError>;

    /// Create one row under the database with the three migration
    /// attributes; returns the assigned page identifier.
    async fn create_row(
        &self,
        database: &NotionId,
        title: &str,
        date: &str,
    ) -> Result<NotionId, AppError>;

    /// Append a single block payload under a parent; returns the newly
    /// assigned identifiers in order.
    async fn append_block(
        &self,
        parent: &NotionId,
        block: serde_json::Value,
    ) -> Result<Vec<NotionId>, AppError>;

    /// List one page of row identifiers from a database query.
    async fn query_rows(
        &self,
        database: &NotionId,
        cursor: Option<String>,
    ) -> Result<Paginated<NotionId>, AppError>;

    /// One page of a full-text search restricted to page objects.
    async fn search_pages(
        &self,
        query: &str,
        cursor: Option<String>,
    ) -> Result<Paginated<NotionId>, AppError>;
}

pub use client::NotionHttpClient;
