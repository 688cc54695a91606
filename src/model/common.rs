use super::Block;
use crate::types::NotionId;
use serde::{Deserialize, Serialize};

/// Common fields shared by all block variants.
///
/// `children` is empty as parsed from the API; the fetcher attaches the
/// fully materialized subtree by constructing a new node with
/// [`Block::with_children`], never by mutating one it already returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCommon {
    pub id: NotionId,
    pub children: Vec<Block>,
    pub has_children: bool,
    pub archived: bool,
}

impl BlockCommon {
    pub fn new(id: NotionId) -> Self {
        Self {
            id,
            children: Vec::new(),
            has_children: false,
            archived: false,
        }
    }

}
