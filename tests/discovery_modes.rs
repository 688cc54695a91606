// tests/discovery_modes.rs
//! The three discovery strategies against the in-memory fake.

mod common;

use common::{test_id, MockApi};
use notion2db::discover::{child_pages_under, database_rows, search_matches};
use notion2db::model::{Block, BlockCommon, ChildPageBlock, ParagraphBlock, TextBlockContent};
use notion2db::pipeline::Pacer;
use notion2db::types::NotionId;
use std::time::Duration;

fn child_page(id: NotionId, title: &str) -> Block {
    Block::ChildPage(ChildPageBlock {
        common: BlockCommon::new(id),
        title: title.to_string(),
    })
}

fn container(id: NotionId) -> Block {
    Block::Paragraph(ParagraphBlock {
        common: BlockCommon {
            has_children: true,
            ..BlockCommon::new(id)
        },
        content: TextBlockContent::default(),
    })
}

fn pacer() -> Pacer {
    Pacer::new(Duration::ZERO)
}

#[tokio::test]
async fn parent_walk_finds_nested_pages_when_recursive() {
    let parent = test_id(1);
    let wrapper = test_id(2);
    let mut api = MockApi::new();
    api.set_children(
        parent.clone(),
        vec![
            child_page(test_id(0x10), "Direct child"),
            container(wrapper.clone()),
        ],
    );
    api.set_children(wrapper.clone(), vec![child_page(test_id(0x11), "Nested")]);

    let found = child_pages_under(&api, &pacer(), &parent, true)
        .await
        .unwrap();
    assert_eq!(found, vec![test_id(0x10), test_id(0x11)]);

    let shallow = child_pages_under(&api, &pacer(), &parent, false)
        .await
        .unwrap();
    assert_eq!(shallow, vec![test_id(0x10)]);
}

#[tokio::test]
async fn database_mode_lists_every_row() {
    let mut api = MockApi::new();
    api.rows = vec![test_id(0x20), test_id(0x21)];

    let found = database_rows(&api, &pacer(), &test_id(0xdb)).await.unwrap();
    assert_eq!(found, vec![test_id(0x20), test_id(0x21)]);
}

#[tokio::test]
async fn search_mode_honors_the_limit() {
    let mut api = MockApi::new();
    api.search_results = vec![test_id(0x30), test_id(0x31), test_id(0x32)];

    let found = search_matches(&api, &pacer(), "journal", Some(2))
        .await
        .unwrap();
    assert_eq!(found, vec![test_id(0x30), test_id(0x31)]);
}
