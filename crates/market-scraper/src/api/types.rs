//! Upstream API response types.
//!
//! Only the fields the scraper reads are declared; everything else in the
//! payloads is ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any listing element identified by `id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IdRef {
    pub id: u64,
}

/// Event listing of the direct layout
#[derive(Debug, Clone, Deserialize)]
pub struct EventListing {
    pub events: Vec<IdRef>,
}

/// Match detail
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    pub name: String,
    /// Epoch seconds
    pub start_time: i64,
    pub class_name: String,
    pub competition_name: String,
    /// Detail groups referenced by the match; the upstream key is misspelled
    #[serde(rename = "addtioanl", alias = "additional")]
    pub additional: Vec<IdRef>,
}

/// One market group of a detail-group response
#[derive(Debug, Clone, Deserialize)]
pub struct GroupPayload {
    pub name: String,
    pub selections: Vec<SelectionPayload>,
}

/// One selection; values are accepted whatever their JSON type
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionPayload {
    #[serde(deserialize_with = "verbatim_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "verbatim_text")]
    pub kind: String,
}

/// Strings as-is, `null` as empty, anything else as its JSON text
fn verbatim_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
