//! CLI error-path specs: no dashboard running to talk to.

use crate::prelude::*;

#[test]
fn hosts_list_fails_when_the_control_socket_does_not_exist() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("control.sock");

    nixfleet().args(&["hosts", "list"]).socket(&missing).run().fails().stderr_has("connecting to");
}

#[test]
fn unknown_op_in_a_stage_is_rejected_before_any_socket_is_touched() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("control.sock");

    nixfleet()
        .args(&["pipelines", "submit", "deploy", "--stage", "web1=not-a-real-op"])
        .socket(&missing)
        .run()
        .fails()
        .stderr_has("unknown op");
}

#[test]
fn submit_without_any_stage_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("control.sock");

    nixfleet()
        .args(&["pipelines", "submit", "deploy"])
        .socket(&missing)
        .run()
        .fails()
        .stderr_has("at least one --stage is required");
}
