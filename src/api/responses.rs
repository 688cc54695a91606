// src/api/responses.rs
//! Wire-format response types and their conversion into the domain model.
//!
//! The Notion API nests each block's payload under a key equal to its type
//! tag, which serde's tagged enums cannot express directly. `RawBlock`
//! therefore captures the common fields plus a flattened remainder, and
//! `into_domain` looks the payload up by tag.

use crate::error::AppError;
use crate::model::{
    Block, BlockCommon, CalloutBlock, ChildDatabaseBlock, ChildPageBlock, CodeBlock, DatabaseSchema,
    DividerBlock, EmbedBlock, FileBlock, FileObject, HeadingBlock, Icon, ImageBlock, ListItemBlock,
    PageProperty, ParagraphBlock, QuoteBlock, SourcePage, TextBlockContent, ToDoBlock,
    UnsupportedBlock,
};
use crate::types::{Annotations, Color, Link, NotionId, RichTextItem, RichTextType};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Generic paginated envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPaginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Any response where only the assigned identifier matters.
#[derive(Debug, Clone, Deserialize)]
pub struct IdOnly {
    pub id: String,
}

impl IdOnly {
    pub fn into_id(self) -> Result<NotionId, AppError> {
        Ok(NotionId::parse(&self.id)?)
    }
}

/// Error body the API returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct RawApiError {
    pub code: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawRichText {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Option<Annotations>,
    #[serde(default)]
    pub text: Option<RawTextContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTextContent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub link: Option<Link>,
}

impl RawRichText {
    pub fn into_domain(self) -> RichTextItem {
        let text_type = match self.kind.as_deref() {
            None | Some("text") => {
                let (content, link) = match self.text {
                    Some(text) => (text.content, text.link),
                    None => (self.plain_text.clone(), None),
                };
                RichTextType::Text { content, link }
            }
            Some("mention") => RichTextType::Mention,
            Some("equation") => RichTextType::Equation,
            Some(other) => RichTextType::Other(other.to_string()),
        };
        RichTextItem {
            text_type,
            annotations: self.annotations,
            plain_text: self.plain_text,
            href: self.href,
        }
    }
}

fn rich_text_array(items: Vec<RawRichText>) -> Vec<RichTextItem> {
    items.into_iter().map(RawRichText::into_domain).collect()
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct RawTextPayload {
    #[serde(default)]
    rich_text: Vec<RawRichText>,
    #[serde(default)]
    color: Option<Color>,
}

impl RawTextPayload {
    fn into_content(self) -> TextBlockContent {
        TextBlockContent {
            rich_text: rich_text_array(self.rich_text),
            color: self.color.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawToDoPayload {
    #[serde(default)]
    rich_text: Vec<RawRichText>,
    #[serde(default)]
    color: Option<Color>,
    #[serde(default)]
    checked: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCodePayload {
    #[serde(default)]
    rich_text: Vec<RawRichText>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCalloutPayload {
    #[serde(default)]
    rich_text: Vec<RawRichText>,
    #[serde(default)]
    color: Option<Color>,
    #[serde(default)]
    icon: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawEmbedPayload {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawChildTitle {
    #[serde(default)]
    title: String,
}

/// A block as the API serializes it: common fields plus a payload keyed by
/// the type tag, captured in the flattened remainder.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

impl RawBlock {
    pub fn into_domain(self) -> Result<Block, AppError> {
        let common = BlockCommon {
            id: NotionId::parse(&self.id)?,
            children: Vec::new(),
            has_children: self.has_children,
            archived: self.archived,
        };
        let payload = self
            .rest
            .get(&self.block_type)
            .cloned()
            .unwrap_or(Value::Object(Default::default()));

        // Payload shapes are lenient: a field the deserializer cannot make
        // sense of downgrades the block to Unsupported instead of failing
        // the whole children page.
        let block = match self.block_type.as_str() {
            "paragraph" => from_value::<RawTextPayload>(&payload)
                .map(|p| Block::Paragraph(ParagraphBlock { common: common.clone(), content: p.into_content() })),
            "heading_1" => from_value::<RawTextPayload>(&payload)
                .map(|p| Block::Heading1(HeadingBlock { common: common.clone(), content: p.into_content() })),
            "heading_2" => from_value::<RawTextPayload>(&payload)
                .map(|p| Block::Heading2(HeadingBlock { common: common.clone(), content: p.into_content() })),
            "heading_3" => from_value::<RawTextPayload>(&payload)
                .map(|p| Block::Heading3(HeadingBlock { common: common.clone(), content: p.into_content() })),
            "bulleted_list_item" => from_value::<RawTextPayload>(&payload)
                .map(|p| Block::BulletedListItem(ListItemBlock { common: common.clone(), content: p.into_content() })),
            "numbered_list_item" => from_value::<RawTextPayload>(&payload)
                .map(|p| Block::NumberedListItem(ListItemBlock { common: common.clone(), content: p.into_content() })),
            "quote" => from_value::<RawTextPayload>(&payload)
                .map(|p| Block::Quote(QuoteBlock { common: common.clone(), content: p.into_content() })),
            "to_do" => from_value::<RawToDoPayload>(&payload).map(|p| {
                Block::ToDo(ToDoBlock {
                    common: common.clone(),
                    content: TextBlockContent {
                        rich_text: rich_text_array(p.rich_text),
                        color: p.color.unwrap_or_default(),
                    },
                    checked: p.checked,
                })
            }),
            "code" => from_value::<RawCodePayload>(&payload).map(|p| {
                Block::Code(CodeBlock {
                    common: common.clone(),
                    language: p.language.unwrap_or_else(|| "plain text".to_string()),
                    content: TextBlockContent {
                        rich_text: rich_text_array(p.rich_text),
                        color: Color::Default,
                    },
                })
            }),
            "callout" => from_value::<RawCalloutPayload>(&payload).map(|p| {
                Block::Callout(CalloutBlock {
                    common: common.clone(),
                    icon: p.icon.and_then(|v| serde_json::from_value::<Icon>(v).ok()),
                    content: TextBlockContent {
                        rich_text: rich_text_array(p.rich_text),
                        color: p.color.unwrap_or_default(),
                    },
                })
            }),
            "divider" => Some(Block::Divider(DividerBlock { common: common.clone() })),
            "embed" => from_value::<RawEmbedPayload>(&payload)
                .map(|p| Block::Embed(EmbedBlock { common: common.clone(), url: p.url })),
            "image" => Some(Block::Image(ImageBlock {
                common: common.clone(),
                source: serde_json::from_value::<FileObject>(payload.clone()).ok(),
            })),
            "file" => Some(Block::File(FileBlock {
                common: common.clone(),
                source: serde_json::from_value::<FileObject>(payload.clone()).ok(),
            })),
            "child_page" => from_value::<RawChildTitle>(&payload)
                .map(|p| Block::ChildPage(ChildPageBlock { common: common.clone(), title: p.title })),
            "child_database" => from_value::<RawChildTitle>(&payload)
                .map(|p| Block::ChildDatabase(ChildDatabaseBlock { common: common.clone(), title: p.title })),
            _ => None,
        };

        Ok(block.unwrap_or_else(|| {
            Block::Unsupported(UnsupportedBlock {
                common,
                block_type: self.block_type,
                payload: Value::Object(self.rest),
            })
        }))
    }
}

fn from_value<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

// ---------------------------------------------------------------------------
// Pages and databases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawProperty {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<Vec<RawRichText>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub properties: HashMap<String, RawProperty>,
}

impl RawPage {
    pub fn into_domain(self) -> Result<SourcePage, AppError> {
        let properties = self
            .properties
            .into_iter()
            .map(|(name, prop)| {
                let value = if prop.kind == "title" {
                    PageProperty::Title {
                        title: rich_text_array(prop.title.unwrap_or_default()),
                    }
                } else {
                    PageProperty::Other { kind: prop.kind }
                };
                (name, value)
            })
            .collect();
        Ok(SourcePage {
            id: NotionId::parse(&self.id)?,
            created_time: self.created_time,
            properties,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSchemaProperty {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDatabase {
    #[serde(default = "Vec::new")]
    pub title: Vec<RawRichText>,
    #[serde(default)]
    pub properties: HashMap<String, RawSchemaProperty>,
}

impl RawDatabase {
    pub fn into_domain(self) -> DatabaseSchema {
        let title: String = self
            .title
            .iter()
            .map(|item| item.plain_text.as_str())
            .collect();
        DatabaseSchema {
            title: if title.is_empty() {
                "Unnamed".to_string()
            } else {
                title
            },
            properties: self
                .properties
                .into_iter()
                .map(|(name, prop)| (name, prop.kind))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_block_parses_paragraph_payload() {
        let json = serde_json::json!({
            "object": "block",
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {
                "rich_text": [
                    {"type": "text", "plain_text": "hello", "text": {"content": "hello"}}
                ]
            }
        });
        let raw: RawBlock = serde_json::from_value(json).unwrap();
        let block = raw.into_domain().unwrap();
        match &block {
            Block::Paragraph(p) => assert_eq!(p.content.rich_text[0].plain_text, "hello"),
            other => panic!("expected paragraph, got {}", other.block_type()),
        }
    }

    #[test]
    fn unknown_type_becomes_unsupported_with_payload() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "synced_block",
            "has_children": true,
            "synced_block": {"synced_from": null}
        });
        let raw: RawBlock = serde_json::from_value(json).unwrap();
        let block = raw.into_domain().unwrap();
        match &block {
            Block::Unsupported(u) => {
                assert_eq!(u.block_type, "synced_block");
                assert!(u.payload.get("synced_block").is_some());
            }
            other => panic!("expected unsupported, got {}", other.block_type()),
        }
        assert!(block.has_children());
    }

    #[test]
    fn image_with_external_url_resolves() {
        let json = serde_json::json!({
            "id": "550e8400e29b41d4a716446655440000",
            "type": "image",
            "image": {"type": "external", "external": {"url": "https://img.example/a.png"}}
        });
        let raw: RawBlock = serde_json::from_value(json).unwrap();
        let block = raw.into_domain().unwrap();
        match block {
            Block::Image(img) => {
                assert_eq!(
                    img.source.unwrap().resolvable_url(),
                    Some("https://img.example/a.png")
                );
            }
            other => panic!("expected image, got {}", other.block_type()),
        }
    }

    #[test]
    fn database_schema_maps_property_types() {
        let json = serde_json::json!({
            "title": [{"type": "text", "plain_text": "Journal"}],
            "properties": {
                "Title": {"id": "a", "type": "title"},
                "Date": {"id": "b", "type": "date"},
                "Archived": {"id": "c", "type": "checkbox"}
            }
        });
        let raw: RawDatabase = serde_json::from_value(json).unwrap();
        let schema = raw.into_domain();
        assert_eq!(schema.title, "Journal");
        assert_eq!(schema.properties["Date"], "date");
    }
}
