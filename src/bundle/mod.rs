//! Diagnostic bundle index
//!
//! This module handles:
//! - Opening the archive (or an extracted directory) once at startup
//! - Reading every expected resource into memory
//! - Recording resources the bundle lacks instead of failing the load
//! - Exact-match lookups by logical name, with an optional sub-key
//!
//! The index is immutable after [`DiagnosticBundle::load`] returns.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{PxDiagError, Result, partially_missing};

pub mod archive;
pub mod layout;
pub mod volumes;

pub use layout::{BundleRoots, EXPECTED_RESOURCES, ExpectedResource, Format};
pub use volumes::Volume;

/// Whether an entry can be rendered as JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Structured,
    Text,
}

/// Captured data of one resource
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    /// Parsed JSON together with the text it was read from
    Structured { raw: String, value: Value },
}

impl Content {
    /// Structured content whose text form is the pretty-printed value
    pub fn structured(value: Value) -> Self {
        let raw = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        Content::Structured { raw, value }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Text(_) => ContentKind::Text,
            Content::Structured { .. } => ContentKind::Structured,
        }
    }

    /// Text as captured
    pub fn raw(&self) -> &str {
        match self {
            Content::Text(text) => text,
            Content::Structured { raw, .. } => raw,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Content::Text(_) => None,
            Content::Structured { value, .. } => Some(value),
        }
    }
}

/// One addressable piece of captured data
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    name: String,
    content: Content,
    sub_index: Option<SubIndex>,
}

impl ResourceEntry {
    pub fn new(name: impl Into<String>, content: Content) -> Self {
        Self {
            name: name.into(),
            content,
            sub_index: None,
        }
    }

    /// Attach a per-record index
    pub fn with_sub_index(mut self, sub_index: SubIndex) -> Self {
        self.sub_index = Some(sub_index);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn kind(&self) -> ContentKind {
        self.content.kind()
    }

    pub fn sub_index(&self) -> Option<&SubIndex> {
        self.sub_index.as_ref()
    }
}

/// Records of a resource addressable by identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubIndex {
    /// Records by identifier
    pub entries: BTreeMap<String, ResourceEntry>,
    /// Secondary names mapping onto an identifier
    pub aliases: BTreeMap<String, String>,
}

impl SubIndex {
    /// Find a record by identifier, then by alias
    pub fn get(&self, key: &str) -> Option<&ResourceEntry> {
        self.entries.get(key).or_else(|| {
            self.aliases
                .get(key)
                .and_then(|id| self.entries.get(id))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything read from one diagnostic archive
#[derive(Debug, Clone, Default)]
pub struct DiagnosticBundle {
    source: String,
    node: Option<String>,
    /// Every expected resource; `None` marks one the bundle lacks
    resources: BTreeMap<String, Option<ResourceEntry>>,
}

impl DiagnosticBundle {
    /// Read a diagnostic archive or extracted directory
    ///
    /// Fails only when the path cannot be opened or unpacked. Missing files
    /// leave their slot empty; see [`DiagnosticBundle::missing`].
    pub fn load(path: &Path) -> Result<Self> {
        let extracted = archive::open(path)?;
        tracing::debug!(
            root = %extracted.root().display(),
            temporary = extracted.is_temporary(),
            "opened bundle"
        );
        let roots = BundleRoots::locate(extracted.root());
        if roots.misc.is_none() && roots.etc.is_none() {
            tracing::warn!(
                path = %path.display(),
                "no diag folders (misc/, etc/pwx/) found in bundle"
            );
        }

        let bundle = Self::from_roots(path.display().to_string(), &roots);
        tracing::info!(
            source = %bundle.source,
            node = bundle.node.as_deref().unwrap_or("-"),
            loaded = bundle.resources.values().filter(|e| e.is_some()).count(),
            missing = bundle.missing().len(),
            "loaded diagnostic bundle"
        );
        Ok(bundle)
    }

    /// Build the index from already located bundle directories
    pub fn from_roots(source: impl Into<String>, roots: &BundleRoots) -> Self {
        let resources = EXPECTED_RESOURCES
            .iter()
            .map(|expected| {
                let entry = roots
                    .path_for(expected)
                    .and_then(|path| read_resource(expected, &path));
                if entry.is_none() {
                    tracing::debug!(
                        resource = expected.name,
                        file = expected.file,
                        "resource missing from bundle"
                    );
                }
                (expected.name.to_string(), entry)
            })
            .collect();

        Self {
            source: source.into(),
            node: roots.node.clone(),
            resources,
        }
    }

    /// Exact-match lookup, then a sub-key lookup when one is given
    ///
    /// Returns `None` when the resource is absent, has no sub-index, or has
    /// no record for the sub-key.
    pub fn lookup(&self, name: &str, sub_key: Option<&str>) -> Option<&ResourceEntry> {
        let entry = self.resources.get(name)?.as_ref()?;
        match sub_key {
            None => Some(entry),
            Some(key) => entry.sub_index()?.get(key),
        }
    }

    /// Names of expected resources the bundle does not contain
    pub fn missing(&self) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|(_, entry)| entry.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The non-fatal warning to show after loading, if anything is missing
    pub fn missing_warning(&self) -> Option<PxDiagError> {
        let missing = self.missing();
        if missing.is_empty() {
            None
        } else {
            Some(partially_missing(
                missing.into_iter().map(str::to_string).collect(),
            ))
        }
    }

    /// Path the bundle was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Node the captures were taken on, when the layout names it
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }
}

fn read_resource(expected: &ExpectedResource, path: &Path) -> Option<ResourceEntry> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read bundle file");
            return None;
        }
    };
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let content = match expected.format {
        Format::Text => Content::Text(text),
        Format::Json => match serde_json::from_str::<Value>(&text) {
            Ok(value) => Content::Structured { raw: text, value },
            Err(e) => {
                tracing::warn!(
                    resource = expected.name,
                    error = %e,
                    "resource is not valid JSON, keeping it as text"
                );
                Content::Text(text)
            }
        },
    };

    let mut entry = ResourceEntry::new(expected.name, content);
    if expected.keyed {
        let index = entry
            .content()
            .value()
            .and_then(|value| volumes::index_volumes(expected.name, value));
        match index {
            Some(index) if index.is_empty() => {
                tracing::debug!(resource = expected.name, "capture holds no records");
                entry = entry.with_sub_index(index);
            }
            Some(index) => {
                tracing::debug!(resource = expected.name, records = index.len(), "indexed records");
                entry = entry.with_sub_index(index);
            }
            None => tracing::warn!(resource = expected.name, "capture is not a list of records"),
        }
    }
    tracing::debug!(resource = expected.name, bytes = bytes.len(), "loaded resource");
    Some(entry)
}
