//! JSON interchange for result collections
//!
//! The export document is a nested map of primitives, arrays and RFC 3339
//! timestamp strings. `decode` reconstructs `encode`'s output exactly,
//! field by field: numbers bit-for-bit, strings verbatim, timestamps
//! through their textual encoding, infinite battery projections through
//! the `"inf"` string form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::results::{AnalysisResult, ResultStore};

/// Top-level export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub export_timestamp: DateTime<Utc>,
    pub result_count: usize,
    pub results: Vec<AnalysisResult>,
}

/// Snapshot the store's contents into an export document.
pub fn encode(store: &ResultStore) -> ExportDocument {
    let results: Vec<AnalysisResult> = store.iter().cloned().collect();
    ExportDocument {
        export_timestamp: Utc::now(),
        result_count: results.len(),
        results,
    }
}

/// Serialize a document to pretty-printed JSON.
pub fn to_json(document: &ExportDocument) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|e| Error::Schema(e.to_string()))
}

/// Parse and validate a JSON export document.
pub fn from_json(json: &str) -> Result<ExportDocument> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| Error::Schema(format!("not valid JSON: {e}")))?;
    decode(value)
}

/// Validate and reconstruct a document from its parsed JSON value.
///
/// A document whose top level lacks a `results` array is rejected with a
/// schema error naming the problem; a malformed entry is rejected with its
/// index and the underlying field error. The import is all-or-nothing;
/// no partially decoded result set is ever produced.
pub fn decode(value: Value) -> Result<ExportDocument> {
    let Value::Object(map) = value else {
        return Err(Error::Schema("top level must be an object".into()));
    };

    let entries = match map.get("results") {
        None => return Err(Error::Schema("missing top-level 'results' list".into())),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(Error::Schema("'results' must be an array".into())),
    };

    let mut results = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let result: AnalysisResult = serde_json::from_value(entry.clone())
            .map_err(|e| Error::Schema(format!("results[{index}]: {e}")))?;
        results.push(result);
    }

    let export_timestamp = match map.get("export_timestamp") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| Error::Schema(format!("export_timestamp: {e}")))?,
        None => DateTime::UNIX_EPOCH,
    };

    Ok(ExportDocument {
        export_timestamp,
        result_count: results.len(),
        results,
    })
}

/// Append a decoded document's results to the store; returns how many were
/// imported.
pub fn import(store: &mut ResultStore, document: ExportDocument) -> usize {
    let count = document.results.len();
    for result in document.results {
        store.insert(result);
    }
    debug!(count, "imported results");
    count
}
