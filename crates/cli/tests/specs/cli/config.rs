//! Configuration file specs

use crate::prelude::*;

#[test]
fn config_from_working_directory_is_used() {
    let temp = Project::empty();
    temp.file("herd.toml", "[coalescer]\nshards = 4\n");

    temp.herd()
        .args(&["bench", "--callers", "4", "--keys", "1", "--delay-ms", "10"])
        .env("RUST_LOG", "herd=debug")
        .passes()
        .stderr_has("shards=4");
}

#[test]
fn explicit_config_path_is_used() {
    let temp = Project::empty();
    temp.file("conf/custom.toml", "[coalescer]\nshards = 2\n");

    temp.herd()
        .args(&[
            "--config",
            "conf/custom.toml",
            "bench",
            "--callers",
            "2",
            "--delay-ms",
            "1",
        ])
        .env("RUST_LOG", "herd=debug")
        .passes()
        .stderr_has("shards=2");
}

#[test]
fn zero_shards_in_config_fails() {
    let temp = Project::empty();
    temp.file("herd.toml", "[coalescer]\nshards = 0\n");

    temp.herd()
        .args(&["bench", "--callers", "1"])
        .fails()
        .stderr_has("Failed to load config 'herd.toml'")
        .stderr_has("shard count must be greater than 0");
}

#[test]
fn missing_explicit_config_fails() {
    let temp = Project::empty();
    temp.herd()
        .args(&["--config", "absent.toml", "bench", "--callers", "1"])
        .fails()
        .stderr_has("absent.toml");
}
