// src/api/client.rs
//! HTTP implementation of the Notion API trait over reqwest.

use crate::error::AppError;
use crate::model::{Block, DatabaseSchema, SourcePage};
use crate::types::{ApiKey, NotionId};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use super::parser::ApiResponse;
use super::responses::{IdOnly, RawBlock, RawDatabase, RawPage, RawPaginated};
use super::{NotionApi, Paginated};

const API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Live Notion API client.
///
/// Authentication and version headers are baked into the underlying
/// client at construction, so individual calls carry only their payload.
pub struct NotionHttpClient {
    http: reqwest::Client,
}

impl NotionHttpClient {
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.as_str()))
            .map_err(|_| AppError::MissingConfiguration("API key contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { http })
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, AppError> {
        let url = format!("{API_BASE}{path}");
        debug!("GET {url}");
        let response = self.http.get(&url).send().await?;
        Self::capture(response, url).await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse, AppError> {
        let url = format!("{API_BASE}{path}");
        debug!("POST {url}");
        let response = self.http.post(&url).json(body).send().await?;
        Self::capture(response, url).await
    }

    async fn patch(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse, AppError> {
        let url = format!("{API_BASE}{path}");
        debug!("PATCH {url}");
        let response = self.http.patch(&url).json(body).send().await?;
        Self::capture(response, url).await
    }

    async fn capture(response: reqwest::Response, url: String) -> Result<ApiResponse, AppError> {
        let status = response.status();
        let body = response.text().await?;
        Ok(ApiResponse { body, status, url })
    }
}

fn id_results(raw: RawPaginated<IdOnly>) -> Result<Paginated<NotionId>, AppError> {
    let results = raw
        .results
        .into_iter()
        .map(IdOnly::into_id)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Paginated {
        results,
        next_cursor: raw.next_cursor,
        has_more: raw.has_more,
    })
}

#[async_trait::async_trait]
impl NotionApi for NotionHttpClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<SourcePage, AppError> {
        let response = self.get(&format!("/pages/{id}")).await?;
        response.parse::<RawPage>()?.into_domain()
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<Paginated<Block>, AppError> {
        let mut path = format!("/blocks/{parent}/children?page_size={page_size}");
        if let Some(cursor) = cursor {
            path.push_str(&format!("&start_cursor={cursor}"));
        }
        let raw: RawPaginated<RawBlock> = self.get(&path).await?.parse()?;
        let results = raw
            .results
            .into_iter()
            .map(RawBlock::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Paginated {
            results,
            next_cursor: raw.next_cursor,
            has_more: raw.has_more,
        })
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<DatabaseSchema, AppError> {
        let response = self.get(&format!("/databases/{id}")).await?;
        Ok(response.parse::<RawDatabase>()?.into_domain())
    }

    async fn create_row(
        &self,
        database: &NotionId,
        title: &str,
        date: &str,
    ) -> Result<NotionId, AppError> {
        let body = json!({
            "parent": { "database_id": database.to_string() },
            "properties": {
                "Title": {
                    "title": [
                        { "text": { "content": title } }
                    ]
                },
                "Date": {
                    "date": { "start": date }
                },
                "Archived": {
                    "checkbox": false
                }
            }
        });
        let response = self.post("/pages", &body).await?;
        response.parse::<IdOnly>()?.into_id()
    }

    async fn append_block(
        &self,
        parent: &NotionId,
        block: serde_json::Value,
    ) -> Result<Vec<NotionId>, AppError> {
        let body = json!({ "children": [block] });
        let response = self.patch(&format!("/blocks/{parent}/children"), &body).await?;
        let raw: RawPaginated<IdOnly> = response.parse()?;
        raw.results
            .into_iter()
            .map(IdOnly::into_id)
            .collect()
    }

    async fn query_rows(
        &self,
        database: &NotionId,
        cursor: Option<String>,
    ) -> Result<Paginated<NotionId>, AppError> {
        let mut body = json!({ "page_size": crate::constants::NOTION_API_PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        let response = self
            .post(&format!("/databases/{database}/query"), &body)
            .await?;
        id_results(response.parse()?)
    }

    async fn search_pages(
        &self,
        query: &str,
        cursor: Option<String>,
    ) -> Result<Paginated<NotionId>, AppError> {
        let mut body = json!({
            "query": query,
            "filter": { "property": "object", "value": "page" },
            "page_size": crate::constants::NOTION_API_PAGE_SIZE,
        });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        let response = self.post("/search", &body).await?;
        id_results(response.parse()?)
    }
}
