#![allow(clippy::unwrap_used, clippy::expect_used)]

use ldapsync_core::errors::LdapSyncError;
use ldapsync_core::logging_facility::test_capture::init_test_capture;
use ldapsync_core::{log_op_end, log_op_error, log_op_start};
use ldapsync_core::{reconcile, Entry, TransformPolicy};
use ldapsync_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    assert_eq!(capture.events_for(op_name, EVENT_START).len(), 1);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name, EVENT_END);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = LdapSyncError::EntryNotFound {
        base: "ou=users,dc=example,dc=com".to_string(),
        filter: "(uid=nobody)".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");

    let error_event = &error_events[0];
    assert_eq!(error_event.level, Level::ERROR);
    assert_eq!(error_event.field("err_code"), Some("ERR_NOT_FOUND"));
    assert_eq!(error_event.field("err_kind"), Some("NotFound"));
}

#[test]
fn test_boundary_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name, dn = "uid=jim,dc=example,dc=com");
    log_op_end!(op_name, duration_ms = 1);

    assert_eq!(capture.events_for(op_name, EVENT_START).len(), 1);
    assert_eq!(capture.events_for(op_name, EVENT_END).len(), 1);
}

#[test]
fn test_log_macros_with_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_5";

    log_op_start!(op_name, dn = "uid=jim,dc=example,dc=com", filter = "(uid=jim)");

    let start_event = capture
        .events_for(op_name, EVENT_START)
        .into_iter()
        .next()
        .expect("Should have start event");

    assert_eq!(start_event.field("dn"), Some("uid=jim,dc=example,dc=com"));
    assert_eq!(start_event.field("filter"), Some("(uid=jim)"));
    assert!(start_event.field("component").is_some());
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_capture_count_events() {
    let capture = init_test_capture();
    let op1_name = "test_count_events_op1_unique_6";
    let op2_name = "test_count_events_op2_unique_6";

    log_op_start!(op1_name);
    log_op_start!(op2_name);
    log_op_end!(op1_name, duration_ms = 10);

    let start_count = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_START)
            && (e.op.as_deref() == Some(op1_name) || e.op.as_deref() == Some(op2_name))
    });
    let end_count = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_END)
            && (e.op.as_deref() == Some(op1_name) || e.op.as_deref() == Some(op2_name))
    });

    assert_eq!(start_count, 2);
    assert_eq!(end_count, 1);
}

#[test]
fn test_reconcile_emits_summary_at_debug() {
    let capture = init_test_capture();
    let dn = "uid=logging-summary-unique,dc=example,dc=com";
    let old = Entry::new(dn).with_attribute("mail", ["old@example.com"]);
    let new = Entry::new(dn).with_attribute("mail", ["new@example.com"]);

    reconcile(&old, &new, &TransformPolicy::new(), dn).unwrap();

    let summaries = capture.count_events(|e| {
        e.level == Level::DEBUG && e.field("dn") == Some(dn) && e.field("changed") == Some("1")
    });
    assert_eq!(summaries, 1);
}

#[test]
fn test_case_collision_warns() {
    let capture = init_test_capture();
    let dn = "uid=collision-unique,dc=example,dc=com";
    let entry = Entry::new(dn)
        .with_attribute("Mail", ["a@example.com"])
        .with_attribute("mail", ["b@example.com"]);

    TransformPolicy::new()
        .with_case_sensitive_names(Vec::<String>::new())
        .normalize_case(&entry);

    let warnings =
        capture.count_events(|e| e.level == Level::WARN && e.field("dn") == Some(dn));
    assert_eq!(warnings, 1);
}
