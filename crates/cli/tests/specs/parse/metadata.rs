//! `herd parse` specs
//!
//! Verify metadata decoding and that concurrent readers of one file share
//! a single read.

use crate::prelude::*;

#[test]
fn parse_prints_metadata_fields() {
    let temp = Project::empty();
    temp.file("page.toml", FULL_METADATA);

    temp.herd()
        .args(&["parse", "page.toml"])
        .passes()
        .stdout_has("page.toml")
        .stdout_has("template: article")
        .stdout_has("inline style: true")
        .stdout_has("head fragments: 1")
        .stdout_has("css: /css/site.css")
        .stdout_has("variables: title, words");
}

#[test]
fn parse_json_uses_document_key_names() {
    let temp = Project::empty();
    temp.file("page.toml", FULL_METADATA);

    let out = temp
        .herd()
        .args(&["parse", "page.toml", "--format", "json"])
        .passes();
    let json = out.json();

    let meta = &json["files"][0]["metadata"];
    assert_eq!(meta["template"], "article");
    assert_eq!(meta["inlineStyle"], true);
    assert_eq!(meta["jsImports"][0], "/js/app.js");
    assert_eq!(meta["variables"]["words"], 1200);
}

#[test]
fn parse_empty_document_uses_defaults() {
    let temp = Project::empty();
    temp.file("empty.toml", "");

    temp.herd()
        .args(&["parse", "empty.toml"])
        .passes()
        .stdout_has("inline script: false")
        .stdout_lacks("css:");
}

#[test]
fn parse_multiple_files_in_order() {
    let temp = Project::empty();
    temp.file("a.toml", "template = \"first\"\n");
    temp.file("b.toml", "template = \"second\"\n");

    let out = temp
        .herd()
        .args(&["parse", "a.toml", "b.toml", "--format", "json"])
        .passes();
    let json = out.json();

    assert_eq!(json["files"][0]["metadata"]["template"], "first");
    assert_eq!(json["files"][1]["metadata"]["template"], "second");
    assert_eq!(json["stats"]["executions"], 2);
}

#[test]
fn stats_account_for_every_caller_once() {
    let temp = Project::empty();
    temp.file("page.toml", FULL_METADATA);

    let out = temp
        .herd()
        .args(&["parse", "page.toml", "--callers", "8", "--format", "json"])
        .passes();
    let json = out.json();

    // However the reads overlapped, each caller is either the reader or a waiter
    let stats = &json["stats"];
    assert_eq!(stats["calls"], 8);
    assert_eq!(
        stats["executions"].as_u64().unwrap() + stats["coalesced"].as_u64().unwrap(),
        8
    );
    assert_eq!(stats["abandoned"], 0);
    assert_eq!(json["files"].as_array().unwrap().len(), 1);
}
