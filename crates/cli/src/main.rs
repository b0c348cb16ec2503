// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herd - coalesce concurrent requests for the same key

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bench, parse};
use herd_core::HerdConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::error::HerdError;
use crate::output::OutputFormat;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "herd.toml";

#[derive(Parser)]
#[command(
    name = "herd",
    version,
    about = "herd - Single-flight request coalescing"
)]
struct Cli {
    /// Path to a herd.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode metadata files, coalescing concurrent reads of each file
    Parse(parse::ParseArgs),
    /// Run concurrent callers against a coalescer and report executions
    Bench(bench::BenchArgs),
}

fn main() -> ExitCode {
    setup_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<HerdError>() {
                Some(err) => eprint!("{}", err.render()),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(shards = config.coalescer.shards, "configuration loaded");

    match cli.command {
        Commands::Parse(args) => parse::parse(args, &config.coalescer, cli.format),
        Commands::Bench(args) => bench::bench(args, &config.coalescer, cli.format),
    }
}

fn load_config(path: Option<&Path>) -> Result<HerdConfig> {
    let path = match path {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(HerdConfig::default());
            }
            default
        }
    };

    HerdConfig::load(path).map_err(|e| HerdError::invalid_config(path, e).into())
}

fn setup_logging() {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();
}
