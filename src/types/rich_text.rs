use super::Color;
use serde::{Deserialize, Serialize};

/// The kind of rich text content — a typed vocabulary replacing
/// stringly-typed dispatch.
///
/// Only literal text carries structure we keep; mention and equation runs
/// exist so the converter can recognize them and fall back to their rendered
/// plain text instead of carrying semantics the append API would reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention,
    Equation,
    Other(String),
}

/// Rich text item with formatting annotations.
///
/// `plain_text` provides the fallback rendering for every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Option<Annotations>,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item — the most common rich text variant.
    pub fn plain(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: None,
            plain_text: text.to_string(),
            href: None,
        }
    }
}

/// Renders a rich text array to its concatenated plain text.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items
        .iter()
        .map(|item| item.plain_text.as_str())
        .collect::<Vec<_>>()
        .join("")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default)]
    pub color: Color,
}
