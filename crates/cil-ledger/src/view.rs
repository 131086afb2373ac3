use serde::{Deserialize, Serialize};
use serde_json::Value;

use cil_types::ReportRecord;

use crate::block::Block;
use crate::error::ChainError;
use crate::traits::ChainReader;

/// Sort order for listing queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// The wire spelling used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Errors from per-block payload decoding.
///
/// These are per-block conditions: a record that fails to decode is
/// unavailable, it does not invalidate the chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("malformed report record in block {index}: {detail}")]
    MalformedRecord { index: u64, detail: String },
}

/// Blocks with `index >= min_index`, sorted by index.
///
/// Consumers use this to hide bootstrap blocks below a display threshold.
/// An empty page is an ordinary result, distinct from any error; the core
/// exposes raw indices only and leaves display transforms to the caller.
pub fn list_from<R: ChainReader>(
    reader: &R,
    min_index: u64,
    order: SortOrder,
) -> Result<Vec<Block>, ChainError> {
    let len = reader.len()?;
    let mut blocks = if min_index >= len {
        Vec::new()
    } else {
        reader.range(min_index, len)?
    };
    if order == SortOrder::Descending {
        blocks.reverse();
    }
    Ok(blocks)
}

/// Decode the domain record carried in a block's `data.text`.
pub fn decode_record(block: &Block) -> Result<ReportRecord, ViewError> {
    serde_json::from_str(&block.data.record).map_err(|e| ViewError::MalformedRecord {
        index: block.index,
        detail: e.to_string(),
    })
}

/// Decode a block's attachment identifiers, flattening nested encodings.
///
/// Each `media` entry may itself be a JSON-encoded array (an artifact of
/// inconsistent serialization upstream). Exactly one nested decode is
/// attempted per entry; anything that does not parse is kept verbatim.
pub fn decode_attachments(block: &Block) -> Vec<String> {
    let mut attachments = Vec::with_capacity(block.data.attachments.len());
    for raw in &block.data.attachments {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => {
                for item in items {
                    match item {
                        Value::String(s) => attachments.push(s),
                        other => attachments.push(other.to_string()),
                    }
                }
            }
            Ok(Value::String(s)) => attachments.push(s),
            _ => attachments.push(raw.clone()),
        }
    }
    attachments
}
