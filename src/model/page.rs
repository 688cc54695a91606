use crate::types::{plain_text_of, RichTextItem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source page metadata — only what title/date inference needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    pub id: crate::types::NotionId,
    pub created_time: Option<chrono::DateTime<chrono::Utc>>,
    pub properties: HashMap<String, PageProperty>,
}

impl SourcePage {
    /// Rendered text of the page's title property, if one exists and is
    /// non-empty after trimming.
    pub fn title_text(&self) -> Option<String> {
        self.properties.values().find_map(|prop| match prop {
            PageProperty::Title { title } => {
                let text = plain_text_of(title).trim().to_string();
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            }
            PageProperty::Other { .. } => None,
        })
    }
}

/// A declared page attribute. Only the title property carries data we use;
/// everything else is kept as an opaque type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageProperty {
    Title { title: Vec<RichTextItem> },
    Other { kind: String },
}

/// Destination database schema: display title plus attribute name → type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub title: String,
    pub properties: HashMap<String, String>,
}

impl DatabaseSchema {
    /// Returns the required attribute names absent from this schema.
    pub fn missing_of<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.properties.contains_key(*name))
            .collect()
    }
}
