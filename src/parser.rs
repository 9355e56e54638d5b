//! Line-delimited JSON decoding for order batches.
//!
//! Content errors never fail a batch: blank lines are dropped and malformed
//! lines are logged and recorded in [`ParsedBatch::skipped`].
use crate::error::{PipelineError, Result};
use crate::model::OrderRecord;
use serde_json::Value;

/// A line the parser refused, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the batch.
    pub line_number: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBatch {
    pub records: Vec<OrderRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Decode raw batch bytes, failing only when they are not UTF-8.
pub fn parse_batch_bytes(key: &str, bytes: &[u8]) -> Result<ParsedBatch> {
    let text = std::str::from_utf8(bytes).map_err(|source| PipelineError::Decode {
        key: key.to_string(),
        source,
    })?;
    Ok(parse_batch(text))
}

pub fn parse_batch(text: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                let skipped = SkippedLine {
                    line_number: idx + 1,
                    reason,
                };
                tracing::warn!(
                    line = skipped.line_number,
                    reason = %skipped.reason,
                    "skipping invalid JSON line"
                );
                batch.skipped.push(skipped);
            }
        }
    }
    batch
}

fn parse_line(line: &str) -> std::result::Result<OrderRecord, String> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(fields)) => Ok(OrderRecord::new(fields)),
        Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
        Err(err) => Err(err.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
