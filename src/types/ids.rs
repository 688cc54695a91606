use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

lazy_static::lazy_static! {
    /// Matches a bare 32-hex identifier or its dashed UUID form anywhere
    /// in a string — the loosest format we accept from identifier files
    /// and CLI arguments.
    static ref EMBEDDED_ID: Regex = Regex::new(
        r"([0-9a-fA-F]{32}|[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})"
    ).expect("embedded ID regex is valid");
}

/// A Notion object identifier (page, database, or block).
///
/// Stored canonically as 32 lowercase hex characters without dashes;
/// `to_hyphenated` produces the dashed UUID form used on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotionId(String);

impl NotionId {
    /// Parses a strict identifier: dashed UUID, bare 32-hex, or a Notion URL.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(NotionId(uuid.as_simple().to_string()));
        }

        if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(NotionId(cleaned.to_lowercase()));
        }

        // Fall back to searching for an embedded identifier (URLs, locators).
        Self::find_in(cleaned).ok_or_else(|| {
            ValidationError::InvalidId(format!("Could not parse Notion ID from: {}", input))
        })
    }

    /// Searches an arbitrary string for an embedded identifier.
    ///
    /// Accepts both undashed and dashed forms and normalizes them; returns
    /// `None` when nothing in the string looks like an identifier. Never
    /// fails and never yields a malformed identifier.
    pub fn find_in(text: &str) -> Option<Self> {
        let captures = EMBEDDED_ID.captures(text)?;
        let raw = captures.get(1)?.as_str().replace('-', "");
        Some(NotionId(raw.to_lowercase()))
    }

    /// Returns the canonical non-hyphenated identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the dashed UUID form for API calls and output files.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..8],
            &self.0[8..12],
            &self.0[12..16],
            &self.0[16..20],
            &self.0[20..32]
        )
    }

    /// The first eight characters of the identifier, used in synthesized
    /// titles and progress output.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hyphenated())
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotionId::parse(&s).map_err(serde::de::Error::custom)
    }
}
