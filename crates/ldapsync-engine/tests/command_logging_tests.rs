#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Boundary logging of the host commands

mod common;

use common::{seeded_directory, JIM_DN, USERS};
use ldapsync_core::logging_facility::test_capture::init_test_capture;
use ldapsync_core::{PolicySettings, TransformPolicy};
use ldapsync_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use ldapsync_engine::commands::{entry_delete, entry_read, entry_update, read_entry};

#[test]
fn test_entry_read_logs_start_and_end() {
    let capture = init_test_capture();
    let directory = seeded_directory();

    entry_read(&directory, JIM_DN, &TransformPolicy::new()).unwrap();

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("entry_read")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field("dn") == Some(JIM_DN)
    });
    assert!(starts >= 1);
    capture.assert_event_exists("entry_read", EVENT_END);
}

#[test]
fn test_failed_delete_logs_error_code() {
    let capture = init_test_capture();
    let directory = seeded_directory();

    entry_delete(&directory, USERS, false).unwrap_err();

    let errors = capture.events_for("entry_delete", EVENT_END_ERROR);
    assert!(errors
        .iter()
        .any(|e| e.field("err_code") == Some("ERR_DIRECTORY")));
}

#[test]
fn test_update_end_event_reports_change_count() {
    let capture = init_test_capture();
    let directory = seeded_directory();
    let dn = "uid=ann,ou=users,dc=example,dc=com";

    entry_update(
        &directory,
        dn,
        r#"{"sn": ["Lee"]}"#,
        r#"{"sn": ["Lee-Mit"], "mail": ["ann@example.com"]}"#,
        &TransformPolicy::new(),
    )
    .unwrap();

    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("entry_update")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("dn") == Some(dn)
            && e.field("changes") == Some("2")
    });
    assert!(ends >= 1);
}

#[test]
fn test_data_source_error_logs_not_found() {
    let capture = init_test_capture();
    let directory = seeded_directory();

    read_entry(
        &directory,
        USERS,
        "(uid=logging-nobody)",
        &PolicySettings::default(),
    )
    .unwrap_err();

    let errors = capture.events_for("read_entry", EVENT_END_ERROR);
    assert!(errors
        .iter()
        .any(|e| e.field("err_code") == Some("ERR_NOT_FOUND")));
}
