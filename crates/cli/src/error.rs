// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failures the CLI reports, rendered with their cause chain and hints.

use std::error::Error as _;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HerdError {
    #[error("Metadata file '{}' not found", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read '{}'", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Invalid metadata in '{}'", path.display())]
    InvalidMetadata {
        path: PathBuf,
        #[source]
        source: herd_meta::ParseError,
    },

    #[error("Failed to load config '{}'", path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: herd_core::ConfigError,
    },
}

impl HerdError {
    pub fn file_not_found(path: &Path) -> Self {
        HerdError::MissingFile {
            path: path.to_path_buf(),
        }
    }

    pub fn unreadable(path: &Path, reason: &str) -> Self {
        HerdError::Unreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_metadata(path: &Path, source: herd_meta::ParseError) -> Self {
        HerdError::InvalidMetadata {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn invalid_config(path: &Path, source: herd_core::ConfigError) -> Self {
        HerdError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Recovery hints for this failure
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            HerdError::MissingFile { .. } => &[
                "check the path is relative to the current directory",
                "list candidate files with `ls *.toml`",
            ],
            HerdError::Unreadable { .. } => &["check the file permissions"],
            HerdError::InvalidMetadata { .. } => &[
                "metadata must be a UTF-8 TOML document",
                "known keys: template, inlineStyle, inlineScript, head, cssImports, jsImports, variables",
            ],
            HerdError::InvalidConfig { .. } => &["expected a [coalescer] table, e.g. shards = 32"],
        }
    }

    /// Full report for stderr: headline, causes, then hints.
    pub fn render(&self) -> String {
        let mut out = format!("error: {self}\n");

        if let HerdError::Unreadable { reason, .. } = self {
            let _ = writeln!(out, "  caused by: {reason}");
        }
        let mut cause = self.source();
        while let Some(err) = cause {
            let _ = writeln!(out, "  caused by: {err}");
            cause = err.source();
        }

        for hint in self.hints() {
            let _ = writeln!(out, "hint: {hint}");
        }
        out
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
