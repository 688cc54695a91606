// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! these should tell you the story of how the tool operates: how much it
//! fetches per round trip and how politely it paces itself.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while walking block trees and database rows.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// How many direct children the metadata inferrer scans when a page has no
/// title property and a heading/paragraph fallback is needed.
pub const TITLE_SCAN_PAGE_SIZE: u32 = 50;

// ---------------------------------------------------------------------------
// Pacing
// ---------------------------------------------------------------------------

/// Default delay in seconds between API calls for the migration pipeline.
///
/// Notion's public rate limit averages three requests per second; a fixed
/// 0.35s pause keeps a sequential run safely under it.
pub const DEFAULT_RATE_SLEEP_SECS: f64 = 0.35;

/// Default delay in seconds between API calls for the discovery utility,
/// which issues only cheap list/query calls.
pub const DISCOVER_RATE_SLEEP_SECS: f64 = 0.25;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing unparseable response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
