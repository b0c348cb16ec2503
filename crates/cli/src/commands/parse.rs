// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herd parse <files>...` - Decode metadata files through a shared coalescer
//!
//! Every file is requested by `--callers` concurrent threads. Callers that
//! overlap share one read of the file, keyed by its path.

use crate::error::HerdError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use herd_core::{Coalescer, CoalescerConfig, StatsSnapshot};
use herd_meta::{parse_metadata, MetaData};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Args)]
pub struct ParseArgs {
    /// Metadata files to decode
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Concurrent callers requesting each file
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub callers: u32,
}

/// A failed read, shared by every caller of the generation
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: io::ErrorKind,
    pub message: String,
}

impl FetchError {
    fn panicked() -> Self {
        Self {
            kind: io::ErrorKind::Other,
            message: "caller thread panicked".to_string(),
        }
    }

    fn into_herd_error(self, path: &Path) -> HerdError {
        match self.kind {
            io::ErrorKind::NotFound => HerdError::file_not_found(path),
            _ => HerdError::unreadable(path, &self.message),
        }
    }
}

fn fetch(path: &Path) -> Result<Vec<u8>, FetchError> {
    tracing::debug!(path = %path.display(), "reading metadata");
    std::fs::read(path).map_err(|e| FetchError {
        kind: e.kind(),
        message: e.to_string(),
    })
}

#[derive(Serialize)]
struct ParsedFile {
    path: String,
    metadata: MetaData,
}

impl fmt::Display for ParsedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = &self.metadata;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "  template: {}", meta.template)?;
        writeln!(f, "  inline style: {}", meta.inline_style)?;
        writeln!(f, "  inline script: {}", meta.inline_script)?;
        writeln!(f, "  head fragments: {}", meta.head.len())?;
        if !meta.css_imports.is_empty() {
            writeln!(f, "  css: {}", meta.css_imports.join(", "))?;
        }
        if !meta.js_imports.is_empty() {
            writeln!(f, "  js: {}", meta.js_imports.join(", "))?;
        }
        if !meta.variables.is_empty() {
            let names: Vec<&str> = meta.variables.keys().map(String::as_str).collect();
            writeln!(f, "  variables: {}", names.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ParseReport {
    files: Vec<ParsedFile>,
    stats: StatsSnapshot,
}

impl fmt::Display for ParseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            write!(f, "{}", file)?;
        }
        writeln!(f, "{}", self.stats)
    }
}

pub fn parse(args: ParseArgs, config: &CoalescerConfig, format: OutputFormat) -> Result<()> {
    let coalescer: Coalescer<Vec<u8>, FetchError> = Coalescer::with_config(config)?;

    let fetched: Vec<Result<Vec<u8>, FetchError>> = {
        let coalescer = &coalescer;
        let callers = args.callers;
        std::thread::scope(|s| {
            let handles: Vec<Vec<_>> = args
                .files
                .iter()
                .map(|path| {
                    (0..callers)
                        .map(move |_| {
                            s.spawn(move || {
                                let key = path.display().to_string();
                                coalescer.run(&key, || fetch(path))
                            })
                        })
                        .collect()
                })
                .collect();

            // Every caller of a file observed the same outcome; keep the first.
            handles
                .into_iter()
                .map(|callers| {
                    let results: Vec<_> = callers
                        .into_iter()
                        .map(|h| h.join().unwrap_or_else(|_| Err(FetchError::panicked())))
                        .collect();
                    results
                        .into_iter()
                        .next()
                        .unwrap_or_else(|| Err(FetchError::panicked()))
                })
                .collect()
        })
    };

    let mut files = Vec::with_capacity(fetched.len());
    for (path, result) in args.files.iter().zip(fetched) {
        let bytes = result.map_err(|e| e.into_herd_error(path))?;
        let metadata =
            parse_metadata(&bytes).map_err(|e| HerdError::invalid_metadata(path, e))?;
        files.push(ParsedFile {
            path: path.display().to_string(),
            metadata,
        });
    }

    let report = ParseReport {
        files,
        stats: coalescer.stats(),
    };
    tracing::info!(files = report.files.len(), stats = %report.stats, "parsed");
    output::print(&report, format);
    Ok(())
}
