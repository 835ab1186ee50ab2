// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `repair` plugin dispatch: command names, skip/only and option hand-off.

#![allow(missing_docs)]

use propchange_core::PROPERTY_CHANGE_STATE;
use propchange_dry_tests::{node_type, ContentFixture, RecordBuilder};
use propchange_repo::plugin::REPAIR_COMMAND;
use propchange_repo::{PropertyChangesRepair, RepairOptions, SUB_COMMAND};

fn fixture() -> ContentFixture {
    ContentFixture::new(
        [node_type("Demo:Page", &["title"])],
        [RecordBuilder::new("a", "/sites/demo/a", "Demo:Page")
            .property("title", "Hello")
            .build()],
    )
}

fn untouched(fixture: &ContentFixture) -> bool {
    fixture.committed("a", PROPERTY_CHANGE_STATE).is_none() && fixture.store.persist_count() == 0
}

#[test]
fn repair_runs_the_backfill() {
    let fixture = fixture();
    let report = PropertyChangesRepair::new(fixture.backfill())
        .invoke(REPAIR_COMMAND, &RepairOptions::default())
        .unwrap();

    assert_eq!(report.map(|r| r.updated), Some(1));
    assert!(!untouched(&fixture));
}

#[test]
fn other_commands_are_ignored() {
    let fixture = fixture();
    let report = PropertyChangesRepair::new(fixture.backfill())
        .invoke("clean", &RepairOptions::default())
        .unwrap();

    assert!(report.is_none());
    assert!(untouched(&fixture));
    assert_eq!(PropertyChangesRepair::short_description("clean"), "");
    assert_eq!(PropertyChangesRepair::description("clean"), "");
}

#[test]
fn skip_list_deselects_the_task() {
    let fixture = fixture();
    let options = RepairOptions {
        skip: Some(format!(" removeUndefinedProperties , {SUB_COMMAND} ")),
        ..RepairOptions::default()
    };
    let report = PropertyChangesRepair::new(fixture.backfill())
        .invoke(REPAIR_COMMAND, &options)
        .unwrap();

    assert!(report.is_none());
    assert!(untouched(&fixture));
}

#[test]
fn only_list_without_the_task_deselects_it() {
    let fixture = fixture();
    let options = RepairOptions {
        only: Some("fixShadowNodes".into()),
        ..RepairOptions::default()
    };
    let report = PropertyChangesRepair::new(fixture.backfill())
        .invoke(REPAIR_COMMAND, &options)
        .unwrap();

    assert!(report.is_none());
    assert!(untouched(&fixture));
}

#[test]
fn dry_run_and_workspace_reach_the_backfill() {
    let fixture = fixture();
    let options = RepairOptions {
        only: Some(SUB_COMMAND.into()),
        dry_run: true,
        workspace: "live".into(),
        ..RepairOptions::default()
    };
    let report = PropertyChangesRepair::new(fixture.backfill())
        .invoke(REPAIR_COMMAND, &options)
        .unwrap();

    assert_eq!(report.map(|r| r.updated), Some(1));
    assert!(untouched(&fixture));

    let elsewhere = RepairOptions {
        workspace: "user-editor".into(),
        ..RepairOptions::default()
    };
    let report = PropertyChangesRepair::new(fixture.backfill())
        .invoke(REPAIR_COMMAND, &elsewhere)
        .unwrap();
    assert_eq!(report.map(|r| r.updated), Some(0));
}

#[test]
fn repair_help_mentions_the_task() {
    assert_eq!(
        PropertyChangesRepair::short_description(REPAIR_COMMAND),
        "Run integrity checks related to Neos features"
    );
    assert!(PropertyChangesRepair::description(REPAIR_COMMAND).contains(SUB_COMMAND));
}
