// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Accept-property endpoint over the in-memory content store.

#![allow(missing_docs)]

use propchange_core::wire::AcceptRequest;
use propchange_core::PROPERTY_CHANGE_STATE;
use propchange_dry_tests::{node_type, ContentFixture, RecordBuilder};
use propchange_repo::{AcceptService, RepairError, StoreError};
use serde_json::json;

fn request(node: &str, property: &str) -> AcceptRequest {
    AcceptRequest {
        node: node.to_owned(),
        property_name: property.to_owned(),
    }
}

fn fixture(row: RecordBuilder) -> ContentFixture {
    ContentFixture::new([node_type("Demo:Page", &["title"])], [row.build()])
}

#[test]
fn accepts_current_value_into_empty_snapshot() {
    let fixture = fixture(
        RecordBuilder::new("a", "/sites/demo/a", "Demo:Page")
            .property("title", "Hello")
            .property(PROPERTY_CHANGE_STATE, "{}"),
    );

    let response = AcceptService::new(&fixture.store, &fixture.store)
        .handle(&request("/sites/demo/a@live", "title"))
        .unwrap();

    assert_eq!(serde_json::to_value(&response).unwrap(), json!({"value": {"title": "Hello"}}));
    assert_eq!(fixture.store.persist_count(), 1);
    assert_eq!(
        fixture.committed("a", PROPERTY_CHANGE_STATE),
        Some(json!(r#"{"title":"Hello"}"#))
    );
}

#[test]
fn other_accepted_values_are_kept() {
    let fixture = fixture(
        RecordBuilder::new("a", "/sites/demo/a", "Demo:Page")
            .property("title", "New")
            .property(PROPERTY_CHANGE_STATE, r#"{"title":"Old","teaser":"T"}"#),
    );

    let response = AcceptService::new(&fixture.store, &fixture.store)
        .handle(&request("/sites/demo/a@live", "title"))
        .unwrap();

    assert_eq!(
        serde_json::to_value(&response.value).unwrap(),
        json!({"teaser": "T", "title": "New"})
    );
}

#[test]
fn nothing_to_accept_writes_nothing() {
    let fixture = fixture(RecordBuilder::new("a", "/sites/demo/a", "Demo:Page"));

    let response = AcceptService::new(&fixture.store, &fixture.store)
        .handle(&request("/sites/demo/a@live", "title"))
        .unwrap();

    assert!(response.value.is_empty());
    assert_eq!(fixture.store.persist_count(), 0);
    assert_eq!(fixture.committed("a", PROPERTY_CHANGE_STATE), None);
}

#[test]
fn resolves_nodes_by_dimensioned_context_path() {
    let fixture = fixture(
        RecordBuilder::new("de", "/sites/demo/a", "Demo:Page")
            .dimension("language", &["de"])
            .property("title", "Hallo"),
    )
    .with_language("en", &["en", "de"]);

    let response = AcceptService::new(&fixture.store, &fixture.store)
        .handle(&request("/sites/demo/a@live;language=de", "title"))
        .unwrap();

    assert_eq!(response.value.get("title"), Some(&json!("Hallo")));
}

#[test]
fn unknown_node_is_not_found() {
    let fixture = fixture(RecordBuilder::new("a", "/sites/demo/a", "Demo:Page"));

    let err = AcceptService::new(&fixture.store, &fixture.store)
        .handle(&request("/sites/demo/missing@live", "title"))
        .unwrap_err();

    assert!(matches!(err, RepairError::Store(StoreError::NotFound(_))));
    assert_eq!(fixture.store.persist_count(), 0);
}

#[test]
fn accept_writes_only_the_addressed_language_variant() {
    let fixture = ContentFixture::new(
        [node_type("Demo:Page", &["title"])],
        [
            RecordBuilder::new("a", "/sites/demo/a", "Demo:Page")
                .dimension("language", &["en"])
                .property("title", "Hello")
                .build(),
            RecordBuilder::new("a", "/sites/demo/a", "Demo:Page")
                .dimension("language", &["de"])
                .property("title", "Hallo")
                .build(),
        ],
    )
    .with_language("en", &["en", "de"]);

    AcceptService::new(&fixture.store, &fixture.store)
        .handle(&request("/sites/demo/a@live;language=de", "title"))
        .unwrap();

    assert_eq!(
        fixture.committed_variant("a", "de", PROPERTY_CHANGE_STATE),
        Some(json!(r#"{"title":"Hallo"}"#))
    );
    assert_eq!(fixture.committed_variant("a", "en", PROPERTY_CHANGE_STATE), None);
}
