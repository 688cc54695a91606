use super::blocks::*;
use super::common::BlockCommon;
use crate::types::NotionId;
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum accessors.
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Embed($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::File($pattern) => $result,
            Block::ChildPage($pattern) => $result,
            Block::ChildDatabase($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// The closed sum of every block kind this tool understands.
///
/// The source system's set of block kinds is open-ended; anything outside
/// this vocabulary parses into `Unsupported`, which carries the original
/// type tag and raw payload so conversion can still salvage text from it.
/// The exhaustive matches over this enum are the point: adding a variant
/// forces every consumer to decide how to handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(ParagraphBlock),
    Heading1(HeadingBlock),
    Heading2(HeadingBlock),
    Heading3(HeadingBlock),
    BulletedListItem(ListItemBlock),
    NumberedListItem(ListItemBlock),
    ToDo(ToDoBlock),
    Quote(QuoteBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Divider(DividerBlock),
    Embed(EmbedBlock),
    Image(ImageBlock),
    File(FileBlock),
    ChildPage(ChildPageBlock),
    ChildDatabase(ChildDatabaseBlock),
    Unsupported(UnsupportedBlock),
}

impl Block {
    /// Get the block's ID
    pub fn id(&self) -> &NotionId {
        match_all_blocks!(self, b => &b.common.id)
    }

    /// Get the block's children
    pub fn children(&self) -> &[Block] {
        match_all_blocks!(self, b => &b.common.children)
    }

    /// Whether the source reported this block as having children.
    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    /// Returns a new node with the given subtree attached.
    ///
    /// Consumes the block: a fetched tree is constructed bottom-up, never
    /// patched after the fact.
    pub fn with_children(self, children: Vec<Block>) -> Block {
        fn attach<F, B>(mut payload: B, children: Vec<Block>, common: F) -> B
        where
            F: FnOnce(&mut B) -> &mut BlockCommon,
        {
            let slot = common(&mut payload);
            slot.has_children = !children.is_empty();
            slot.children = children;
            payload
        }

        match self {
            Block::Paragraph(b) => Block::Paragraph(attach(b, children, |b| &mut b.common)),
            Block::Heading1(b) => Block::Heading1(attach(b, children, |b| &mut b.common)),
            Block::Heading2(b) => Block::Heading2(attach(b, children, |b| &mut b.common)),
            Block::Heading3(b) => Block::Heading3(attach(b, children, |b| &mut b.common)),
            Block::BulletedListItem(b) => {
                Block::BulletedListItem(attach(b, children, |b| &mut b.common))
            }
            Block::NumberedListItem(b) => {
                Block::NumberedListItem(attach(b, children, |b| &mut b.common))
            }
            Block::ToDo(b) => Block::ToDo(attach(b, children, |b| &mut b.common)),
            Block::Quote(b) => Block::Quote(attach(b, children, |b| &mut b.common)),
            Block::Callout(b) => Block::Callout(attach(b, children, |b| &mut b.common)),
            Block::Code(b) => Block::Code(attach(b, children, |b| &mut b.common)),
            Block::Divider(b) => Block::Divider(attach(b, children, |b| &mut b.common)),
            Block::Embed(b) => Block::Embed(attach(b, children, |b| &mut b.common)),
            Block::Image(b) => Block::Image(attach(b, children, |b| &mut b.common)),
            Block::File(b) => Block::File(attach(b, children, |b| &mut b.common)),
            Block::ChildPage(b) => Block::ChildPage(attach(b, children, |b| &mut b.common)),
            Block::ChildDatabase(b) => Block::ChildDatabase(attach(b, children, |b| &mut b.common)),
            Block::Unsupported(b) => Block::Unsupported(attach(b, children, |b| &mut b.common)),
        }
    }

    /// The source system's type tag for this block.
    pub fn block_type(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo(_) => "to_do",
            Block::Quote(_) => "quote",
            Block::Callout(_) => "callout",
            Block::Code(_) => "code",
            Block::Divider(_) => "divider",
            Block::Embed(_) => "embed",
            Block::Image(_) => "image",
            Block::File(_) => "file",
            Block::ChildPage(_) => "child_page",
            Block::ChildDatabase(_) => "child_database",
            Block::Unsupported(b) => &b.block_type,
        }
    }
}
