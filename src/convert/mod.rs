// src/convert/mod.rs
//! Block conversion: maps fetched source blocks to destination-writable
//! payloads.
//!
//! Conversion is total. Every input, however malformed, yields some
//! converted block; the degradation rules (media without a resolvable URL,
//! unknown types) are the documented placeholders, never an error.

use crate::api::responses::RawRichText;
use crate::model::{Block, Icon, UnsupportedBlock};
use crate::types::{Annotations, RichTextItem, RichTextType};
use serde_json::{json, Value};

pub const IMAGE_PLACEHOLDER: &str = "[Image removed - original not accessible]";
pub const FILE_PLACEHOLDER: &str = "[File removed - original not accessible]";

/// Payload keys probed, in order, when salvaging text from an unknown block.
const SALVAGE_KEYS: [&str; 6] = [
    "paragraph",
    "heading_1",
    "heading_2",
    "heading_3",
    "bulleted_list_item",
    "numbered_list_item",
];

/// A normalized inline text span, ready for the append API.
///
/// Every source run reduces to this: literal content taken from the
/// rendered plain text, a link kept only for literal-text runs, and the
/// original annotations when present.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    pub link: Option<String>,
    pub annotations: Option<Annotations>,
}

impl TextRun {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: None,
            annotations: None,
        }
    }

    fn to_json(&self) -> Value {
        let mut text = json!({ "content": self.content });
        if let Some(url) = &self.link {
            text["link"] = json!({ "url": url });
        }
        let mut run = json!({ "type": "text", "text": text });
        if let Some(annotations) = &self.annotations {
            run["annotations"] = json!(annotations);
        }
        run
    }
}

/// Reduce one source run to a normalized text run.
///
/// Cross-reference and formula runs degrade to their rendered plain text.
/// The hyperlink survives only on literal-text runs.
pub fn convert_rich_text(item: &RichTextItem) -> TextRun {
    let link = match &item.text_type {
        RichTextType::Text { .. } => item.href.clone(),
        _ => None,
    };
    TextRun {
        content: item.plain_text.clone(),
        link,
        annotations: item.annotations.clone(),
    }
}

fn convert_runs(items: &[RichTextItem]) -> Vec<TextRun> {
    items.iter().map(convert_rich_text).collect()
}

/// The normalized payload of one converted block.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertedBody {
    Paragraph(Vec<TextRun>),
    Heading1(Vec<TextRun>),
    Heading2(Vec<TextRun>),
    Heading3(Vec<TextRun>),
    BulletedListItem(Vec<TextRun>),
    NumberedListItem(Vec<TextRun>),
    ToDo { runs: Vec<TextRun>, checked: bool },
    Quote(Vec<TextRun>),
    Code { runs: Vec<TextRun>, language: String },
    Callout { runs: Vec<TextRun>, icon: Option<Icon> },
    Divider,
    Embed { url: Option<String> },
    Image { url: String },
    File { url: String },
}

impl ConvertedBody {
    /// The destination type tag this body appends as.
    pub fn type_tag(&self) -> &'static str {
        match self {
            ConvertedBody::Paragraph(_) => "paragraph",
            ConvertedBody::Heading1(_) => "heading_1",
            ConvertedBody::Heading2(_) => "heading_2",
            ConvertedBody::Heading3(_) => "heading_3",
            ConvertedBody::BulletedListItem(_) => "bulleted_list_item",
            ConvertedBody::NumberedListItem(_) => "numbered_list_item",
            ConvertedBody::ToDo { .. } => "to_do",
            ConvertedBody::Quote(_) => "quote",
            ConvertedBody::Code { .. } => "code",
            ConvertedBody::Callout { .. } => "callout",
            ConvertedBody::Divider => "divider",
            ConvertedBody::Embed { .. } => "embed",
            ConvertedBody::Image { .. } => "image",
            ConvertedBody::File { .. } => "file",
        }
    }
}

/// One converted block plus its converted subtree.
///
/// Created from exactly one source block, consumed exactly once by the
/// re-inserter.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedBlock {
    pub body: ConvertedBody,
    pub children: Vec<ConvertedBlock>,
}

impl ConvertedBlock {
    fn leaf(body: ConvertedBody) -> Self {
        Self {
            body,
            children: Vec::new(),
        }
    }

    /// The single-block payload for the append API. Children are not
    /// included; the re-inserter attaches them under the identifier the
    /// destination assigns to this block.
    pub fn to_request_json(&self) -> Value {
        fn runs_json(runs: &[TextRun]) -> Value {
            Value::Array(runs.iter().map(TextRun::to_json).collect())
        }

        let tag = self.body.type_tag();
        let payload = match &self.body {
            ConvertedBody::Paragraph(runs)
            | ConvertedBody::Heading1(runs)
            | ConvertedBody::Heading2(runs)
            | ConvertedBody::Heading3(runs)
            | ConvertedBody::BulletedListItem(runs)
            | ConvertedBody::NumberedListItem(runs)
            | ConvertedBody::Quote(runs) => json!({ "rich_text": runs_json(runs) }),
            ConvertedBody::ToDo { runs, checked } => {
                json!({ "rich_text": runs_json(runs), "checked": checked })
            }
            ConvertedBody::Code { runs, language } => {
                json!({ "rich_text": runs_json(runs), "language": language })
            }
            ConvertedBody::Callout { runs, icon } => {
                let mut payload = json!({ "rich_text": runs_json(runs) });
                if let Some(icon) = icon {
                    payload["icon"] = json!(icon);
                }
                payload
            }
            ConvertedBody::Divider => json!({}),
            ConvertedBody::Embed { url } => json!({ "url": url }),
            ConvertedBody::Image { url } | ConvertedBody::File { url } => {
                json!({ "type": "external", "external": { "url": url } })
            }
        };

        json!({ "type": tag, tag: payload })
    }
}

/// Convert one source block and, recursively, its attached children.
pub fn convert_block(block: &Block) -> ConvertedBlock {
    let body = match block {
        Block::Paragraph(b) => ConvertedBody::Paragraph(convert_runs(&b.content.rich_text)),
        Block::Heading1(b) => ConvertedBody::Heading1(convert_runs(&b.content.rich_text)),
        Block::Heading2(b) => ConvertedBody::Heading2(convert_runs(&b.content.rich_text)),
        Block::Heading3(b) => ConvertedBody::Heading3(convert_runs(&b.content.rich_text)),
        Block::BulletedListItem(b) => {
            ConvertedBody::BulletedListItem(convert_runs(&b.content.rich_text))
        }
        Block::NumberedListItem(b) => {
            ConvertedBody::NumberedListItem(convert_runs(&b.content.rich_text))
        }
        Block::ToDo(b) => ConvertedBody::ToDo {
            runs: convert_runs(&b.content.rich_text),
            checked: b.checked,
        },
        Block::Quote(b) => ConvertedBody::Quote(convert_runs(&b.content.rich_text)),
        Block::Code(b) => ConvertedBody::Code {
            runs: convert_runs(&b.content.rich_text),
            language: b.language.clone(),
        },
        Block::Callout(b) => ConvertedBody::Callout {
            runs: convert_runs(&b.content.rich_text),
            icon: b.icon.clone(),
        },
        Block::Divider(_) => ConvertedBody::Divider,
        Block::Embed(b) => ConvertedBody::Embed { url: b.url.clone() },
        Block::Image(b) => match b.source.as_ref().and_then(|s| s.resolvable_url()) {
            Some(url) => ConvertedBody::Image {
                url: url.to_string(),
            },
            None => ConvertedBody::Paragraph(vec![TextRun::plain(IMAGE_PLACEHOLDER)]),
        },
        Block::File(b) => match b.source.as_ref().and_then(|s| s.resolvable_url()) {
            Some(url) => ConvertedBody::File {
                url: url.to_string(),
            },
            None => ConvertedBody::Paragraph(vec![TextRun::plain(FILE_PLACEHOLDER)]),
        },
        Block::ChildPage(_) | Block::ChildDatabase(_) => unsupported_body(block.block_type(), None),
        Block::Unsupported(b) => unsupported_body(&b.block_type, Some(b)),
    };

    ConvertedBlock {
        body,
        children: block.children().iter().map(convert_block).collect(),
    }
}

/// Downgrade an unknown block: salvage text buried under a known container
/// key, or fall back to the literal placeholder naming the original type.
fn unsupported_body(type_tag: &str, block: Option<&UnsupportedBlock>) -> ConvertedBody {
    if let Some(runs) = block.and_then(salvage_runs) {
        return ConvertedBody::Paragraph(runs);
    }
    ConvertedBody::Paragraph(vec![TextRun::plain(format!(
        "[Unsupported block type copied as placeholder: {type_tag}]"
    ))])
}

fn salvage_runs(block: &UnsupportedBlock) -> Option<Vec<TextRun>> {
    for key in SALVAGE_KEYS {
        let Some(items) = block
            .payload
            .get(key)
            .and_then(|payload| payload.get("rich_text"))
            .and_then(Value::as_array)
        else {
            continue;
        };
        if items.is_empty() {
            continue;
        }
        let runs = items
            .iter()
            .filter_map(|item| serde_json::from_value::<RawRichText>(item.clone()).ok())
            .map(|raw| convert_rich_text(&raw.into_domain()))
            .collect::<Vec<_>>();
        if !runs.is_empty() {
            return Some(runs);
        }
    }
    None
}

/// Total block count of a converted forest, nested descendants included.
pub fn count_blocks(blocks: &[ConvertedBlock]) -> usize {
    blocks
        .iter()
        .map(|block| 1 + count_blocks(&block.children))
        .sum()
}
