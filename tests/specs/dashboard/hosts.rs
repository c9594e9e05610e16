//! Host-inspection specs against a live `nixfleetd`. No agent ever connects
//! in these tests, so the fleet is always empty — that's the behavior under
//! test, not an oversight.

use crate::prelude::*;

#[test]
fn hosts_list_is_empty_with_no_agents_connected() {
    let dashboard = Dashboard::start();
    dashboard.cli().args(&["hosts", "list"]).run().succeeds();
}

#[test]
fn hosts_get_on_an_unknown_hostname_fails() {
    let dashboard = Dashboard::start();
    dashboard.cli().args(&["hosts", "get", "web-07"]).run().fails().stderr_has("no such host");
}

#[test]
fn hosts_remove_on_an_unknown_hostname_is_idempotent() {
    // RemoveHost isn't conditioned on the host existing (§10.1): removing
    // something absent is a no-op success, not an error.
    let dashboard = Dashboard::start();
    dashboard.cli().args(&["hosts", "remove", "web-07"]).run().succeeds().stdout_has("ok");
}
