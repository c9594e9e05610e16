//! Pipeline submit/list/cancel specs against a live `nixfleetd`, driven
//! entirely through the `nixfleet` CLI and the administrative control
//! socket (no agent connects; the stages never actually run).

use crate::prelude::*;

#[test]
fn pipelines_list_is_empty_before_anything_is_submitted() {
    let dashboard = Dashboard::start();
    dashboard.cli().args(&["pipelines", "list"]).run().succeeds();
}

#[test]
fn submit_then_list_then_get_round_trips_the_pipeline() {
    let dashboard = Dashboard::start();

    let submitted = dashboard
        .cli()
        .args(&["pipelines", "submit", "roll out", "--stage", "web1,web2=switch"])
        .run()
        .succeeds();
    let id = submitted.stdout().trim().to_string();
    assert!(id.starts_with("pln-"), "expected a pln- id, got {id:?}");

    dashboard.cli().args(&["pipelines", "list"]).run().succeeds().stdout_has(&id).stdout_has("roll out");

    dashboard.cli().args(&["pipelines", "get", &id]).run().succeeds().stdout_has("roll out");
}

#[test]
fn cancel_then_cancel_again_rejects_the_second_attempt() {
    let dashboard = Dashboard::start();

    let id = dashboard
        .cli()
        .args(&["pipelines", "submit", "rollback-all", "--stage", "db1=rollback"])
        .run()
        .succeeds()
        .stdout()
        .trim()
        .to_string();

    dashboard.cli().args(&["pipelines", "cancel", &id]).run().succeeds();
    dashboard
        .cli()
        .args(&["pipelines", "cancel", &id])
        .run()
        .fails()
        .stderr_has("already finished");
}

#[test]
fn cancel_on_an_unknown_id_fails() {
    let dashboard = Dashboard::start();
    dashboard.cli().args(&["pipelines", "cancel", "pln-does-not-exist"]).run().fails().stderr_has("no such pipeline");
}

#[test]
fn get_matches_on_an_id_prefix() {
    let dashboard = Dashboard::start();

    let id = dashboard
        .cli()
        .args(&["pipelines", "submit", "refresh-lock-fleet", "--stage", "web1=refresh-lock"])
        .run()
        .succeeds()
        .stdout()
        .trim()
        .to_string();
    let prefix = &id[..id.len() - 4];

    dashboard.cli().args(&["pipelines", "get", prefix]).run().succeeds().stdout_has("refresh-lock-fleet");
}
