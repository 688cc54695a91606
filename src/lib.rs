// src/lib.rs
//! Migrates Notion pages and their nested block trees into rows of a
//! target Notion database.
//!
//! The pipeline per page: fetch the full block tree, infer a title and an
//! ISO date, create a database row, convert every block to an appendable
//! payload, then rebuild the tree under the new page. A companion
//! discovery utility enumerates candidate source pages by walking a parent
//! page, querying a database, or searching the workspace.

pub mod api;
pub mod config;
pub mod constants;
pub mod convert;
pub mod discover;
pub mod error;
pub mod input;
pub mod model;
pub mod pipeline;
pub mod types;

pub use error::{AppError, Result};
