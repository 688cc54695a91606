// src/api/pagination.rs
//! Cursor-draining helper shared by the fetcher and the discovery
//! strategies.

use crate::error::AppError;
use crate::pipeline::Pacer;
use std::future::Future;

use super::Paginated;

/// Follows a cursor-paginated endpoint to exhaustion, pacing before each
/// follow-up request.
///
/// `fetch` is called with `None` first, then with each `next_cursor` the
/// previous page reported. With a `limit`, draining stops as soon as that
/// many results are in hand, without issuing further requests.
pub async fn drain_cursor<T, F, Fut>(
    pacer: &Pacer,
    limit: Option<usize>,
    mut fetch: F,
) -> Result<Vec<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Paginated<T>, AppError>>,
{
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;
    let mut first = true;

    loop {
        if !first {
            pacer.pause().await;
        }
        first = false;

        let page = fetch(cursor.take()).await?;
        collected.extend(page.results);

        if let Some(limit) = limit {
            if collected.len() >= limit {
                collected.truncate(limit);
                return Ok(collected);
            }
        }

        match (page.has_more, page.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            _ => return Ok(collected),
        }
    }
}
