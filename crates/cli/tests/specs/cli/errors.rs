//! Error reporting specs

use crate::prelude::*;

#[test]
fn missing_file_reports_hints() {
    let temp = Project::empty();
    temp.herd()
        .args(&["parse", "nope.toml"])
        .fails()
        .stderr_has("error: Metadata file 'nope.toml' not found")
        .stderr_has("hint: check the path");
}

#[test]
fn invalid_metadata_names_the_file() {
    let temp = Project::empty();
    temp.file("broken.toml", "template = 3\n");

    temp.herd()
        .args(&["parse", "broken.toml"])
        .fails()
        .stderr_has("Invalid metadata in 'broken.toml'")
        .stderr_has("TOML parse error");
}

#[test]
fn non_utf8_metadata_is_rejected() {
    let temp = Project::empty();
    temp.bytes("binary.toml", &[0x74, 0x3d, 0xff, 0xfe]);

    temp.herd()
        .args(&["parse", "binary.toml"])
        .fails()
        .stderr_has("not valid UTF-8");
}

#[test]
fn parse_requires_a_file() {
    let temp = Project::empty();
    temp.herd().args(&["parse"]).fails();
}

#[test]
fn zero_callers_rejected() {
    let temp = Project::empty();
    temp.file("page.toml", FULL_METADATA);
    temp.herd()
        .args(&["parse", "page.toml", "--callers", "0"])
        .fails();
}
