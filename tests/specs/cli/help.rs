//! CLI help/usage output specs — no dashboard needed.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_nonzero() {
    nixfleet().run().fails().stderr_has("Usage:");
}

#[test]
fn help_shows_usage() {
    nixfleet().args(&["--help"]).run().succeeds().stdout_has("Usage:");
}

#[test]
fn hosts_help_shows_subcommands() {
    nixfleet().args(&["hosts", "--help"]).run().succeeds().stdout_has("list").stdout_has("remove");
}

#[test]
fn pipelines_help_shows_subcommands() {
    nixfleet()
        .args(&["pipelines", "--help"])
        .run()
        .succeeds()
        .stdout_has("list")
        .stdout_has("submit")
        .stdout_has("cancel");
}

#[test]
fn version_shows_version() {
    nixfleet().args(&["--version"]).run().succeeds().stdout_has("nixfleet");
}
