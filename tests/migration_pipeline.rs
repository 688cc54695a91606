// tests/migration_pipeline.rs
//! End-to-end pipeline scenarios against the in-memory fake.

mod common;

use chrono::{DateTime, Utc};
use common::{test_id, MockApi};
use notion2db::api::Paginated;
use notion2db::input::read_identifier_file;
use notion2db::model::{
    Block, BlockCommon, DatabaseSchema, HeadingBlock, PageProperty, ParagraphBlock, SourcePage,
    TextBlockContent,
};
use notion2db::pipeline::{migrate_page, run_batch, MigrationContext, Pacer};
use notion2db::pipeline::fetch::fetch_block_tree;
use notion2db::pipeline::metadata::infer_title_and_date;
use notion2db::types::{NotionId, RichTextItem};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn paragraph(id: NotionId, text: &str, has_children: bool) -> Block {
    Block::Paragraph(ParagraphBlock {
        common: BlockCommon {
            has_children,
            ..BlockCommon::new(id)
        },
        content: TextBlockContent {
            rich_text: vec![RichTextItem::plain(text)],
            ..Default::default()
        },
    })
}

fn heading(id: NotionId, text: &str) -> Block {
    Block::Heading1(HeadingBlock {
        common: BlockCommon::new(id),
        content: TextBlockContent {
            rich_text: vec![RichTextItem::plain(text)],
            ..Default::default()
        },
    })
}

fn page(id: NotionId, title: Option<&str>, created: Option<&str>) -> SourcePage {
    let mut properties = HashMap::new();
    if let Some(title) = title {
        properties.insert(
            "Title".to_string(),
            PageProperty::Title {
                title: vec![RichTextItem::plain(title)],
            },
        );
    }
    properties.insert(
        "Tags".to_string(),
        PageProperty::Other {
            kind: "multi_select".to_string(),
        },
    );
    SourcePage {
        id,
        created_time: created.map(|raw| raw.parse::<DateTime<Utc>>().unwrap()),
        properties,
    }
}

fn full_schema() -> DatabaseSchema {
    DatabaseSchema {
        title: "Journal".to_string(),
        properties: HashMap::from([
            ("Title".to_string(), "title".to_string()),
            ("Date".to_string(), "date".to_string()),
            ("Archived".to_string(), "checkbox".to_string()),
        ]),
    }
}

fn live_context(api: Arc<MockApi>) -> MigrationContext {
    MigrationContext {
        api: Some(api),
        pacer: Pacer::new(Duration::ZERO),
        dry_run: false,
        target_db: Some(test_id(0xdb)),
    }
}

#[tokio::test]
async fn title_property_with_embedded_date_wins() {
    let source = test_id(1);
    let mut api = MockApi::new();
    api.pages.insert(
        source.clone(),
        page(source.clone(), Some("Trip Log 2024-03-15"), Some("2020-01-01T00:00:00Z")),
    );

    let metadata = infer_title_and_date(&api, &source).await.unwrap();
    assert_eq!(metadata.title, "Trip Log 2024-03-15");
    assert_eq!(metadata.date.as_deref(), Some("2024-03-15"));
}

#[tokio::test]
async fn heading_fallback_and_creation_date() {
    let source = test_id(2);
    let mut api = MockApi::new();
    api.pages.insert(
        source.clone(),
        page(source.clone(), None, Some("2023-05-01T10:00:00Z")),
    );
    api.set_children(source.clone(), vec![heading(test_id(20), "Notes")]);

    let metadata = infer_title_and_date(&api, &source).await.unwrap();
    assert_eq!(metadata.title, "Notes");
    assert_eq!(metadata.date.as_deref(), Some("2023-05-01"));
}

#[tokio::test]
async fn title_is_synthesized_when_nothing_is_found() {
    let source = NotionId::parse("abcdef1234567890abcdef1234567890").unwrap();
    let mut api = MockApi::new();
    api.pages.insert(source.clone(), page(source.clone(), None, None));

    let metadata = infer_title_and_date(&api, &source).await.unwrap();
    assert_eq!(metadata.title, "Imported page abcdef12");
    assert_eq!(metadata.date, None);
}

#[tokio::test]
async fn fetch_stitches_cursor_pages_in_order_and_recurses() {
    let source = test_id(9);
    let mut api = MockApi::new();
    api.set_children_page(
        source.clone(),
        None,
        Paginated {
            results: vec![
                paragraph(test_id(0x91), "first", false),
                paragraph(test_id(0x92), "second", false),
            ],
            next_cursor: Some("page-two".to_string()),
            has_more: true,
        },
    );
    api.set_children_page(
        source.clone(),
        Some("page-two"),
        Paginated::complete(vec![paragraph(test_id(0x93), "third", true)]),
    );
    api.set_children(test_id(0x93), vec![paragraph(test_id(0x94), "nested", false)]);

    let tree = fetch_block_tree(&api, &Pacer::new(Duration::ZERO), &source)
        .await
        .unwrap();

    let ids: Vec<_> = tree.iter().map(|block| block.id().clone()).collect();
    assert_eq!(ids, vec![test_id(0x91), test_id(0x92), test_id(0x93)]);
    assert_eq!(tree[2].children().len(), 1);
    assert_eq!(tree[2].children()[0].id(), &test_id(0x94));
}

#[tokio::test]
async fn live_migration_rebuilds_the_tree_under_assigned_parents() {
    let source = test_id(3);
    let mut api = MockApi::new();
    api.schema = Some(full_schema());
    api.pages.insert(
        source.clone(),
        page(source.clone(), Some("Trip Log 2024-03-15"), None),
    );
    api.set_children(
        source.clone(),
        vec![
            paragraph(test_id(31), "parent", true),
            paragraph(test_id(32), "second", false),
        ],
    );
    api.set_children(test_id(31), vec![paragraph(test_id(33), "child", false)]);

    let api = Arc::new(api);
    let ctx = live_context(api.clone());
    migrate_page(&ctx, &source).await.unwrap();

    let created = api.created_rows.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    let (page_id, title, date) = created[0].clone();
    assert_eq!(title, "Trip Log 2024-03-15");
    assert_eq!(date, "2024-03-15");

    let appends = api.appends.lock().unwrap().clone();
    assert_eq!(appends.len(), 3);

    // First top-level block goes under the new page.
    assert_eq!(appends[0].0, page_id);
    assert_eq!(
        appends[0].1["paragraph"]["rich_text"][0]["text"]["content"],
        "parent"
    );
    // Its child goes under the identifier that append assigned, which the
    // counter makes the next id after the created row.
    assert_eq!(appends[1].0, test_id(0xdd00_0001));
    assert_eq!(
        appends[1].1["paragraph"]["rich_text"][0]["text"]["content"],
        "child"
    );
    // The second top-level block returns to the page as parent.
    assert_eq!(appends[2].0, page_id);
}

#[tokio::test]
async fn schema_mismatch_names_date_and_writes_nothing() {
    let source = test_id(4);
    let mut api = MockApi::new();
    api.schema = Some(DatabaseSchema {
        title: "Journal".to_string(),
        properties: HashMap::from([
            ("Title".to_string(), "title".to_string()),
            ("Archived".to_string(), "checkbox".to_string()),
        ]),
    });
    api.pages
        .insert(source.clone(), page(source.clone(), Some("Entry"), None));

    let api = Arc::new(api);
    let ctx = live_context(api.clone());
    let err = migrate_page(&ctx, &source).await.unwrap_err();

    assert!(err.to_string().contains("Date"));
    assert!(err.to_string().contains("missing required properties"));
    assert_eq!(api.write_calls(), 0);
}

#[tokio::test]
async fn dry_run_performs_zero_write_calls() {
    let source = test_id(5);
    let mut api = MockApi::new();
    api.schema = Some(full_schema());
    api.pages
        .insert(source.clone(), page(source.clone(), Some("Entry"), None));
    api.set_children(source.clone(), vec![paragraph(test_id(51), "text", false)]);

    let api = Arc::new(api);
    let ctx = MigrationContext {
        api: Some(api.clone()),
        pacer: Pacer::new(Duration::ZERO),
        dry_run: true,
        target_db: None,
    };

    migrate_page(&ctx, &source).await.unwrap();
    assert_eq!(api.write_calls(), 0);
}

#[tokio::test]
async fn credential_less_dry_run_simulates_the_whole_job() {
    let ctx = MigrationContext {
        api: None,
        pacer: Pacer::new(Duration::ZERO),
        dry_run: true,
        target_db: None,
    };
    migrate_page(&ctx, &test_id(6)).await.unwrap();
}

#[tokio::test]
async fn batch_records_the_failure_and_continues() {
    let good = test_id(7);
    let missing = test_id(8);
    let mut api = MockApi::new();
    api.schema = Some(full_schema());
    api.pages
        .insert(good.clone(), page(good.clone(), Some("Entry"), None));

    let ctx = live_context(Arc::new(api));
    let report = run_batch(&ctx, &[missing.clone(), good.clone()]).await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, missing);
    assert!(report.failures[0].1.contains("object_not_found"));
}

#[tokio::test]
async fn identifier_file_drives_exactly_one_job() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "550e8400-e29b-41d4-a716-446655440000").unwrap();
    writeln!(file, "this line has no identifier").unwrap();

    let ids = read_identifier_file(file.path(), None).unwrap();
    assert_eq!(ids.len(), 1);

    let ctx = MigrationContext {
        api: None,
        pacer: Pacer::new(Duration::ZERO),
        dry_run: true,
        target_db: None,
    };
    let report = run_batch(&ctx, &ids).await;
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);
}
