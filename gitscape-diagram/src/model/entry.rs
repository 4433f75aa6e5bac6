//! Path entries as reported by a repository tree listing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Kind of a path entry, as spelled by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryKind {
    /// A file
    Blob,
    /// A directory
    Tree,
    /// Anything else (submodule commits, symlinks...)
    Other(String),
}

impl EntryKind {
    pub fn is_blob(&self) -> bool {
        matches!(self, EntryKind::Blob)
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
            EntryKind::Other(kind) => kind,
        }
    }
}

impl From<String> for EntryKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "blob" => EntryKind::Blob,
            "tree" => EntryKind::Tree,
            _ => EntryKind::Other(value),
        }
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Other(kind) => kind,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file or directory, identified by its slash-separated path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Path from the repository root, without a leading slash.
    pub path: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl PathEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
            size: None,
        }
    }

    pub fn blob(path: impl Into<String>, size: u64) -> Self {
        Self {
            size: Some(size),
            ..Self::new(path, EntryKind::Blob)
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::Tree)
    }
}

/// Accepted document shapes: a bare list, or a tree listing response.
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryDocument {
    List(Vec<PathEntry>),
    Listing { tree: Vec<PathEntry> },
}

/// Parse a JSON document of path entries.
///
/// Accepts either a bare array of entries or an object carrying them under
/// `tree` (the shape of a repository tree listing). Unknown fields are ignored.
pub fn entries_from_json(json: &str) -> Result<Vec<PathEntry>, InputError> {
    let document: EntryDocument = serde_json::from_str(json)?;
    let entries = match document {
        EntryDocument::List(entries) => entries,
        EntryDocument::Listing { tree } => tree,
    };
    log::debug!("parsed {} path entries", entries.len());
    Ok(entries)
}
