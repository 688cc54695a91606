mod block;
pub mod blocks;
pub mod common;
mod page;

pub use block::Block;
pub use blocks::*;
pub use common::BlockCommon;
pub use page::{DatabaseSchema, PageProperty, SourcePage};
