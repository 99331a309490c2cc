//! Row to price point conversion
//!
//! Every non-group column becomes a field of the price point, in header order.
//! Blank cells are left out. Quantity columns become integers, configured
//! numeric columns become JSON numbers, `validFrom` is checked to be a date,
//! and everything else stays a string.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use pcat_common::config::ImportConfig;
use pcat_common::document::PRICE_POINTS_FIELD;
use pcat_common::model::{MAX_QUANTITY, MIN_QUANTITY, VALID_FROM};
use pcat_common::{DocumentReport, PriceDocument, PricePoint, ProcessOptions};
use serde_json::{json, Map, Number, Value};
use tracing::{debug, info};

use crate::error::ImportError;
use crate::table::{parse_table, Delimiter, Table};

/// Import settings
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Column naming the pricing container of each row
    pub group_column: String,
    /// Columns parsed as JSON numbers
    pub numeric_columns: Vec<String>,
    /// Forced delimiter; detected from the header when `None`
    pub delimiter: Option<Delimiter>,
    /// Container collection field and normalization settings
    pub process: ProcessOptions,
    /// Normalize quantity ranges before returning the document
    pub normalize: bool,
}

impl ImportOptions {
    pub fn from_config(config: &ImportConfig, process: ProcessOptions) -> Self {
        Self {
            group_column: config.group_column.clone(),
            numeric_columns: config.numeric_columns.clone(),
            delimiter: None,
            process,
            normalize: false,
        }
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default(), ProcessOptions::default())
    }
}

/// What an import produced
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub containers: usize,
    pub price_points: usize,
    /// Present when ranges were normalized
    pub normalized: Option<DocumentReport>,
}

/// Parse delimited text and build a fixture document from it
pub fn import_text(
    text: &str,
    options: &ImportOptions,
) -> Result<(PriceDocument, ImportSummary), ImportError> {
    let table = parse_table(text, options.delimiter)?;
    debug!(
        "Parsed {} columns, {} data rows",
        table.header.len(),
        table.rows.len()
    );

    let mut document = build_document(&table, options)?;
    let (containers, price_points) = count(&document, &options.process.collection_field);

    let normalized = if options.normalize {
        let report = document.process(&options.process)?;
        info!(
            "Normalized ranges: {} price points rewritten",
            report.points_rewritten()
        );
        Some(report)
    } else {
        None
    };

    info!(
        "Imported {} price points into {} containers",
        price_points, containers
    );

    Ok((
        document,
        ImportSummary {
            containers,
            price_points,
            normalized,
        },
    ))
}

/// Group rows into containers, in order of first appearance
pub fn build_document(table: &Table, options: &ImportOptions) -> Result<PriceDocument, ImportError> {
    let group_index = table
        .column(&options.group_column)
        .ok_or_else(|| ImportError::MissingGroupColumn {
            column: options.group_column.clone(),
        })?;

    let mut containers: Vec<(String, Vec<Value>)> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for row in &table.rows {
        let group_id = &row.cells[group_index];
        if group_id.is_empty() {
            return Err(ImportError::MissingGroupId {
                line: row.line,
                column: options.group_column.clone(),
            });
        }

        let mut point = Map::new();
        for (column, cell) in table.header.iter().zip(&row.cells) {
            if column == &options.group_column || cell.is_empty() {
                continue;
            }
            point.insert(column.clone(), convert_cell(column, cell, row.line, options)?);
        }

        let point = Value::Object(point);
        PricePoint::from_value(0, point.clone())
            .map_err(|source| ImportError::InvalidPoint {
                line: row.line,
                source,
            })?;

        let slot = *by_id.entry(group_id.clone()).or_insert_with(|| {
            containers.push((group_id.clone(), Vec::new()));
            containers.len() - 1
        });
        containers[slot].1.push(point);
    }

    let containers: Vec<Value> = containers
        .into_iter()
        .map(|(id, points)| json!({ "id": id, PRICE_POINTS_FIELD: points }))
        .collect();

    let mut root = Map::new();
    root.insert(options.process.collection_field.clone(), Value::Array(containers));
    Ok(PriceDocument::from_value(Value::Object(root)))
}

fn convert_cell(
    column: &str,
    cell: &str,
    line: usize,
    options: &ImportOptions,
) -> Result<Value, ImportError> {
    if column == MIN_QUANTITY || column == MAX_QUANTITY {
        return match cell.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(Value::from(n)),
            _ => Err(ImportError::InvalidInteger {
                line,
                column: column.to_string(),
                value: cell.to_string(),
            }),
        };
    }

    if column == VALID_FROM {
        let valid = NaiveDate::parse_from_str(cell, "%Y-%m-%d").is_ok()
            || DateTime::parse_from_rfc3339(cell).is_ok();
        if !valid {
            return Err(ImportError::InvalidDate {
                line,
                column: column.to_string(),
                value: cell.to_string(),
            });
        }
        return Ok(Value::String(cell.to_string()));
    }

    if options.numeric_columns.iter().any(|c| c == column) {
        return parse_number(cell).ok_or_else(|| ImportError::InvalidNumber {
            line,
            column: column.to_string(),
            value: cell.to_string(),
        });
    }

    Ok(Value::String(cell.to_string()))
}

fn parse_number(cell: &str) -> Option<Value> {
    if let Ok(n) = cell.parse::<i64>() {
        return Some(Value::from(n));
    }
    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn count(document: &PriceDocument, field: &str) -> (usize, usize) {
    let containers = document
        .as_value()
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let points = containers
        .iter()
        .filter_map(|c| c.get(PRICE_POINTS_FIELD).and_then(Value::as_array))
        .map(Vec::len)
        .sum();

    (containers.len(), points)
}
