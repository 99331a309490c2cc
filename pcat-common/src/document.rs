//! Fixture documents
//!
//! A document is one JSON file holding a collection of pricing containers:
//!
//! ```json
//! { "priceGroups": [ { "id": "...", "pricePoints": [ { ... } ] } ] }
//! ```
//!
//! The whole document is loaded, rewritten in memory and only serialized once
//! every container has been processed, so a failure never leaves a partially
//! rewritten file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{ContainerError, DocumentError};
use crate::model::PricePoint;
use crate::normalize::{normalize_points, ConflictPolicy, NormalizeOptions};

/// Default name of the container collection field
pub const DEFAULT_COLLECTION_FIELD: &str = "priceGroups";

/// Field holding a container's price points
pub const PRICE_POINTS_FIELD: &str = "pricePoints";

/// Options applied while processing a document
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub collection_field: String,
    pub normalize: NormalizeOptions,
    pub conflict_policy: ConflictPolicy,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            collection_field: DEFAULT_COLLECTION_FIELD.to_string(),
            normalize: NormalizeOptions::default(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

/// Result of processing a single container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContainerOutcome {
    /// Not an object, or without a usable `pricePoints` array; passed through
    Invalid { id: String },
    /// Price points were normalized
    Processed {
        id: String,
        changed_points: usize,
        skipped_groups: usize,
    },
}

impl ContainerOutcome {
    pub fn id(&self) -> &str {
        match self {
            ContainerOutcome::Invalid { id } | ContainerOutcome::Processed { id, .. } => id,
        }
    }

    pub fn changed_points(&self) -> usize {
        match self {
            ContainerOutcome::Processed { changed_points, .. } => *changed_points,
            ContainerOutcome::Invalid { .. } => 0,
        }
    }
}

/// Per-document processing summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub containers: Vec<ContainerOutcome>,
}

impl DocumentReport {
    pub fn containers_seen(&self) -> usize {
        self.containers.len()
    }

    pub fn containers_modified(&self) -> usize {
        self.containers.iter().filter(|c| c.changed_points() > 0).count()
    }

    pub fn containers_invalid(&self) -> usize {
        self.containers
            .iter()
            .filter(|c| matches!(c, ContainerOutcome::Invalid { .. }))
            .count()
    }

    pub fn points_rewritten(&self) -> usize {
        self.containers.iter().map(ContainerOutcome::changed_points).sum()
    }

    pub fn is_modified(&self) -> bool {
        self.points_rewritten() > 0
    }
}

/// A fixture document held in memory
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDocument {
    root: Value,
}

impl PriceDocument {
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::from_value)
    }

    /// Read and parse a document from disk
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Normalize the price points of every container
    ///
    /// On error the document is left exactly as it was.
    pub fn process(&mut self, options: &ProcessOptions) -> Result<DocumentReport, DocumentError> {
        let field = &options.collection_field;
        let containers = self
            .root
            .get(field)
            .and_then(Value::as_array)
            .ok_or_else(|| DocumentError::MissingCollection {
                field: field.clone(),
            })?;

        let mut report = DocumentReport::default();
        let mut rewritten = Vec::with_capacity(containers.len());

        for (index, container) in containers.iter().enumerate() {
            let (container, outcome) = process_container(index, container, options)?;
            rewritten.push(container);
            report.containers.push(outcome);
        }

        if let Some(slot) = self.root.get_mut(field) {
            *slot = Value::Array(rewritten);
        }
        Ok(report)
    }

    /// Two-space indented JSON with a trailing newline
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.root)?;
        text.push('\n');
        Ok(text)
    }

    /// Write the document atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let io_error = |source: std::io::Error| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        };

        let text = self
            .to_pretty_string()
            .map_err(|e| io_error(std::io::Error::other(e)))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir).map_err(io_error)?;
        temp.write_all(text.as_bytes()).map_err(io_error)?;
        temp.flush().map_err(io_error)?;

        // The temp file is created owner-only; a replaced file keeps its mode
        if let Ok(metadata) = std::fs::metadata(path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(io_error)?;
        }
        temp.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

fn container_id(index: usize, container: &Value) -> String {
    match container.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Null) | None => format!("#{}", index),
        Some(other) => other.to_string(),
    }
}

fn process_container(
    index: usize,
    container: &Value,
    options: &ProcessOptions,
) -> Result<(Value, ContainerOutcome), DocumentError> {
    let id = container_id(index, container);

    let Some(raw_points) = container.get(PRICE_POINTS_FIELD).and_then(Value::as_array) else {
        warn!("Container {} has no {} array, leaving it unchanged", id, PRICE_POINTS_FIELD);
        return Ok((container.clone(), ContainerOutcome::Invalid { id }));
    };

    let fail = |source: ContainerError| DocumentError::Container {
        id: id.clone(),
        source,
    };

    let mut points = Vec::with_capacity(raw_points.len());
    for (i, value) in raw_points.iter().enumerate() {
        let point = PricePoint::from_value(i, value.clone())
            .map_err(|source| fail(ContainerError::Point { index: i, source }))?;
        points.push(point);
    }

    let before: Vec<_> = points.iter().map(PricePoint::bounds).collect();

    let normalized = normalize_points(points, &options.normalize, options.conflict_policy)
        .map_err(|e| fail(ContainerError::Normalize(e)))?;

    let changed_points = before
        .iter()
        .zip(normalized.points.iter().map(PricePoint::bounds))
        .filter(|(before, after)| **before != *after)
        .count();

    if changed_points > 0 {
        debug!("Container {}: {} price points rewritten", id, changed_points);
    }

    let mut container = container.clone();
    container[PRICE_POINTS_FIELD] =
        Value::Array(normalized.points.into_iter().map(PricePoint::into_value).collect());

    Ok((
        container,
        ContainerOutcome::Processed {
            id,
            changed_points,
            skipped_groups: normalized.skipped_groups.len(),
        },
    ))
}
