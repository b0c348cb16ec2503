// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metadata TOML parsing
//!
//! A metadata document describes how a page is rendered:
//!
//! ```toml
//! template = "article"
//! inlineStyle = true
//! inlineScript = false
//! head = ['<meta name="robots" content="noindex">']
//! cssImports = ["/css/site.css"]
//! jsImports = ["/js/app.js"]
//!
//! [variables]
//! title = "Hello"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during metadata parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("metadata is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Decoded page metadata
///
/// Keys missing from the document take their empty or false default.
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetaData {
    /// Name of the template to render with
    pub template: String,
    pub inline_style: bool,
    pub inline_script: bool,
    /// Raw markup fragments for the document head, emitted unescaped
    pub head: Vec<String>,
    pub css_imports: Vec<String>,
    pub js_imports: Vec<String>,
    /// Free-form values made available to the template
    pub variables: BTreeMap<String, toml::Value>,
}

impl MetaData {
    /// Get a template variable by name
    pub fn variable(&self, name: &str) -> Option<&toml::Value> {
        self.variables.get(name)
    }
}

/// Parse metadata from a raw TOML payload
pub fn parse_metadata(data: &[u8]) -> Result<MetaData, ParseError> {
    let content = std::str::from_utf8(data)?;
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
