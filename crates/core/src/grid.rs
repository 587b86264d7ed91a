//! Shapes of the live grid state that snapshots and share tokens carry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter model: field name to filter predicate.
pub type FilterModel = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinnedSide {
    Left,
    Right,
}

/// State of a single column as reported by the grid.
///
/// Keys the grid reports that are not modelled here (row grouping,
/// aggregation, flex) are kept in `extra` so they survive a save/apply
/// cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnState {
    pub col_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<PinnedSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColumnState {
    pub fn new(col_id: impl Into<String>) -> Self {
        Self {
            col_id: col_id.into(),
            width: None,
            hide: None,
            pinned: None,
            sort: None,
            sort_index: None,
            extra: Map::new(),
        }
    }
}

/// Everything a deep link carries: the column layout, the filter model,
/// or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedGridState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnState>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterModel>,
}

impl SharedGridState {
    pub fn is_empty(&self) -> bool {
        self.columns.is_none() && self.filters.is_none()
    }
}

/// Parse a column-family payload.
pub fn parse_columns(payload: &str) -> Result<Vec<ColumnState>, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Parse a filter-family payload. An empty string or `null` is an empty
/// model.
pub fn parse_filters(payload: &str) -> Result<FilterModel, serde_json::Error> {
    if payload.trim().is_empty() {
        return Ok(FilterModel::new());
    }
    Ok(serde_json::from_str::<Option<FilterModel>>(payload)?.unwrap_or_default())
}

/// Read `pivot.pivotMode` out of a serialized whole-grid state.
///
/// Missing keys and malformed input both read as `false`.
pub fn pivot_mode(all_state: &str) -> bool {
    serde_json::from_str::<Value>(all_state)
        .ok()
        .and_then(|v| v.pointer("/pivot/pivotMode").and_then(Value::as_bool))
        .unwrap_or(false)
}
