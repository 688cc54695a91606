// tests/common/mod.rs
//! Shared in-memory Notion fake for integration tests.

use notion2db::api::{NotionApi, Paginated};
use notion2db::error::{AppError, NotionErrorCode};
use notion2db::model::{Block, DatabaseSchema, SourcePage};
use notion2db::types::NotionId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub fn test_id(n: u64) -> NotionId {
    NotionId::parse(&format!("{:032x}", n as u128)).unwrap()
}

/// In-memory stand-in for the Notion service.
///
/// Reads come from the configured maps; writes are recorded and assign
/// fresh identifiers so insertion order and parent mapping can be
/// asserted.
#[derive(Default)]
pub struct MockApi {
    pub pages: HashMap<NotionId, SourcePage>,
    pub children: HashMap<(NotionId, Option<String>), Paginated<Block>>,
    pub schema: Option<DatabaseSchema>,
    pub rows: Vec<NotionId>,
    pub search_results: Vec<NotionId>,
    next_id: AtomicU64,
    pub created_rows: Mutex<Vec<(NotionId, String, String)>>,
    pub appends: Mutex<Vec<(NotionId, serde_json::Value)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0xdd00_0000),
            ..Self::default()
        }
    }

    fn assign_id(&self) -> NotionId {
        test_id(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// All of a parent's children as one complete page.
    pub fn set_children(&mut self, parent: NotionId, blocks: Vec<Block>) {
        self.children
            .insert((parent, None), Paginated::complete(blocks));
    }

    /// One cursor-keyed page of a parent's children, for exercising the
    /// multi-page fetch path.
    pub fn set_children_page(
        &mut self,
        parent: NotionId,
        cursor: Option<&str>,
        page: Paginated<Block>,
    ) {
        self.children
            .insert((parent, cursor.map(str::to_string)), page);
    }

    pub fn write_calls(&self) -> usize {
        self.created_rows.lock().unwrap().len() + self.appends.lock().unwrap().len()
    }

    fn not_found(what: &NotionId) -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::from_api_response("object_not_found"),
            message: format!("Could not find object {what}."),
            status: reqwest::StatusCode::NOT_FOUND,
        }
    }
}

#[async_trait::async_trait]
impl NotionApi for MockApi {
    async fn retrieve_page(&self, id: &NotionId) -> Result<SourcePage, AppError> {
        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
        _page_size: u32,
    ) -> Result<Paginated<Block>, AppError> {
        Ok(self
            .children
            .get(&(parent.clone(), cursor))
            .cloned()
            .unwrap_or_else(|| Paginated::complete(Vec::new())))
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<DatabaseSchema, AppError> {
        self.schema.clone().ok_or_else(|| Self::not_found(id))
    }

    async fn create_row(
        &self,
        _database: &NotionId,
        title: &str,
        date: &str,
    ) -> Result<NotionId, AppError> {
        let id = self.assign_id();
        self.created_rows
            .lock()
            .unwrap()
            .push((id.clone(), title.to_string(), date.to_string()));
        Ok(id)
    }

    async fn append_block(
        &self,
        parent: &NotionId,
        block: serde_json::Value,
    ) -> Result<Vec<NotionId>, AppError> {
        let id = self.assign_id();
        self.appends.lock().unwrap().push((parent.clone(), block));
        Ok(vec![id])
    }

    async fn query_rows(
        &self,
        _database: &NotionId,
        _cursor: Option<String>,
    ) -> Result<Paginated<NotionId>, AppError> {
        Ok(Paginated::complete(self.rows.clone()))
    }

    async fn search_pages(
        &self,
        _query: &str,
        _cursor: Option<String>,
    ) -> Result<Paginated<NotionId>, AppError> {
        Ok(Paginated::complete(self.search_results.clone()))
    }
}
