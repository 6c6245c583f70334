//! The user-authored page definition and its section tree.
//!
//! A page definition is a YAML or TOML document:
//!
//! ```yaml
//! title: "my-fork"
//! def:
//!   title: "Fork changes"
//!   description: "Everything this fork changes compared to upstream."
//!   sub:
//!     - title: "Consensus changes"
//!       globs: ["consensus"]
//!     - title: "Docs"
//!       globs: ["*.md"]
//! ```
//!
//! Unknown fields at any level are rejected so that authoring typos surface
//! as errors instead of silently dropping a section's globs.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ForkDiffError, Result};

/// Top-level page definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    /// Page title, rendered as the document heading.
    pub title: String,
    /// Root of the section tree.
    pub def: SectionNode,
}

/// One node of the section tree. Children are owned, so the tree is finite
/// and acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionNode {
    pub title: String,
    /// Markdown text; may be empty.
    #[serde(default)]
    pub description: String,
    /// Shell-style patterns, expanded in order.
    #[serde(default)]
    pub globs: Vec<String>,
    #[serde(default, rename = "sub")]
    pub children: Vec<SectionNode>,
}

impl SectionNode {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globs = globs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_child(mut self, child: SectionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in the subtree rooted here, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SectionNode::node_count).sum::<usize>()
    }
}

/// Serialization format of a page definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    Yaml,
    Toml,
}

impl PageFormat {
    /// Picks the format from the file extension; anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => PageFormat::Toml,
            _ => PageFormat::Yaml,
        }
    }
}

impl Page {
    /// Reads and parses the page definition at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ForkDiffError::ConfigUnreadable`] if the file cannot be read and
    /// [`ForkDiffError::SchemaViolation`] if it does not match the schema.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ForkDiffError::ConfigUnreadable { path: path.to_path_buf(), source }
        })?;
        let parsed = match PageFormat::from_path(path) {
            PageFormat::Yaml => parse_yaml(&raw),
            PageFormat::Toml => parse_toml(&raw),
        };
        parsed.map_err(|message| ForkDiffError::SchemaViolation {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parses a YAML page definition held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ForkDiffError::SchemaViolation`] with an empty path.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        parse_yaml(raw).map_err(in_memory_violation)
    }

    /// Parses a TOML page definition held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ForkDiffError::SchemaViolation`] with an empty path.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        parse_toml(raw).map_err(in_memory_violation)
    }
}

fn parse_yaml(raw: &str) -> std::result::Result<Page, String> {
    serde_yaml::from_str(raw).map_err(|e| e.to_string())
}

fn parse_toml(raw: &str) -> std::result::Result<Page, String> {
    toml::from_str(raw).map_err(|e| e.to_string())
}

fn in_memory_violation(message: String) -> ForkDiffError {
    ForkDiffError::SchemaViolation { path: Default::default(), message }
}
