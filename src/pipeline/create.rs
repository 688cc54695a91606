// src/pipeline/create.rs
//! Destination row creation, with schema validation up front.

use crate::error::AppError;
use crate::types::NotionId;
use log::info;
use std::fmt;

use super::MigrationContext;

/// Attributes the destination database must expose.
pub const REQUIRED_PROPERTIES: [&str; 3] = ["Title", "Date", "Archived"];

/// The page a converted tree gets inserted under.
///
/// Dry runs never contact the destination, so their identifier is a
/// locally generated placeholder rather than a real page id.
#[derive(Debug, Clone, PartialEq)]
pub enum NewPage {
    Created(NotionId),
    Simulated(String),
}

impl NewPage {
    pub fn live_id(&self) -> Option<&NotionId> {
        match self {
            NewPage::Created(id) => Some(id),
            NewPage::Simulated(_) => None,
        }
    }
}

impl fmt::Display for NewPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewPage::Created(id) => id.fmt(f),
            NewPage::Simulated(id) => f.write_str(id),
        }
    }
}

/// Create one row under the target database, or simulate it in dry-run.
///
/// The live path first retrieves the database and verifies the three
/// required attributes exist, failing with an error that names exactly
/// which are missing before any write is attempted.
pub async fn create_destination_page(
    ctx: &MigrationContext,
    title: &str,
    date: &str,
) -> Result<NewPage, AppError> {
    if ctx.dry_run {
        let id = format!("dryrun-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        info!("[DRY-RUN] Would create row: title {title:?}, date {date}, simulated id {id}");
        return Ok(NewPage::Simulated(id));
    }

    let api = ctx.api()?;
    let database = ctx.target_db.as_ref().ok_or_else(|| {
        AppError::MissingConfiguration(
            "a target database id is required outside dry-run mode".to_string(),
        )
    })?;

    let schema = api.retrieve_database(database).await?;
    info!("Database found: {}", schema.title);

    let missing = schema.missing_of(&REQUIRED_PROPERTIES);
    if !missing.is_empty() {
        let mut found: Vec<String> = schema.properties.keys().cloned().collect();
        found.sort();
        return Err(AppError::SchemaMismatch {
            missing: missing.into_iter().map(str::to_string).collect(),
            found,
        });
    }

    ctx.pacer.pause().await;
    let id = api.create_row(database, title, date).await?;
    info!("Created destination page {id}");
    Ok(NewPage::Created(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pacer;
    use std::time::Duration;

    #[tokio::test]
    async fn dry_run_returns_a_placeholder_without_contacting_anything() {
        let ctx = MigrationContext {
            api: None,
            pacer: Pacer::new(Duration::ZERO),
            dry_run: true,
            target_db: None,
        };
        let page = create_destination_page(&ctx, "Entry", "2024-01-01")
            .await
            .unwrap();
        match page {
            NewPage::Simulated(id) => {
                assert!(id.starts_with("dryrun-"));
                assert_eq!(id.len(), "dryrun-".len() + 8);
            }
            NewPage::Created(_) => panic!("dry run must not create pages"),
        }
    }
}
