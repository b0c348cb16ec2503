//! Help output specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    let temp = Project::empty();
    temp.herd()
        .args(&["--help"])
        .passes()
        .stdout_has("parse")
        .stdout_has("bench");
}

#[test]
fn parse_help_documents_callers() {
    let temp = Project::empty();
    temp.herd()
        .args(&["parse", "--help"])
        .passes()
        .stdout_has("--callers");
}

#[test]
fn version_is_reported() {
    assert_cmd::Command::new(env!("CARGO_BIN_EXE_herd"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("herd "));
}

#[test]
fn binary_is_built_alongside_specs() {
    let binary = std::path::Path::new(env!("CARGO_BIN_EXE_herd"));
    assert!(binary.exists(), "missing {}", binary.display());
}
