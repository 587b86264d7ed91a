//! Saved grid views: the persisted row, its create/update DTOs and the
//! validation applied before anything is sent to the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, UserId};
use crate::wire;

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum length for a view name.
pub const MAX_VIEW_NAME_LEN: usize = 200;

/// Maximum length for a view description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/* --------------------------------------------------------------------------
   View kind
   -------------------------------------------------------------------------- */

/// Which family of grid state a snapshot captures.
///
/// Column snapshots store the column layout (order, width, sort, pinning,
/// visibility). Filter snapshots store the filter model. Each family lives
/// behind its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Columns,
    Filters,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Columns => "columns",
            ViewKind::Filters => "filters",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "columns" => Ok(ViewKind::Columns),
            "filters" => Ok(ViewKind::Filters),
            other => Err(CoreError::Validation(format!(
                "Invalid view kind '{other}'. Must be one of: columns, filters"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity struct (backend row)
// ---------------------------------------------------------------------------

/// One saved view as stored by the settings backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    #[serde(deserialize_with = "wire::id")]
    pub id: DbId,
    #[serde(rename = "userId", deserialize_with = "wire::id")]
    pub owner_id: UserId,
    #[serde(rename = "pageId")]
    pub page_id: String,
    #[serde(rename = "table_name", default, deserialize_with = "wire::string")]
    pub name: String,
    #[serde(
        rename = "table_description",
        default,
        deserialize_with = "wire::string"
    )]
    pub description: String,
    /// Serialized column state or filter model. Opaque at this layer.
    #[serde(rename = "data", default, deserialize_with = "wire::string")]
    pub payload: String,
    /// Whole-grid state captured next to a column layout (pivot mode etc.).
    #[serde(rename = "allState", default, skip_serializing_if = "Option::is_none")]
    pub all_state: Option<String>,
    #[serde(
        rename = "table_default",
        default,
        deserialize_with = "wire::flag",
        serialize_with = "wire::serialize_flag"
    )]
    pub is_default: bool,
    /// Filter count recorded at save time; never recomputed on read.
    #[serde(
        rename = "totalFiltersApplied",
        default,
        deserialize_with = "wire::opt_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_filters_applied: Option<i64>,
}

impl ViewSnapshot {
    /// Build the cached row for a freshly created snapshot.
    pub fn from_new(id: DbId, dto: &NewSnapshot) -> Self {
        Self {
            id,
            owner_id: dto.owner_id,
            page_id: dto.page_id.clone(),
            name: dto.name.clone(),
            description: dto.description.clone(),
            payload: dto.payload.clone(),
            all_state: dto.all_state.clone(),
            is_default: dto.is_default,
            total_filters_applied: dto.total_filters_applied,
        }
    }

    /// Merge the provided fields of `patch` into this row.
    ///
    /// Mirrors the backend's merge semantics so callers can keep a local
    /// copy in sync without re-fetching.
    pub fn apply_patch(&mut self, patch: &SnapshotPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(payload) = &patch.payload {
            self.payload = payload.clone();
        }
        if let Some(all_state) = &patch.all_state {
            self.all_state = Some(all_state.clone());
        }
        if let Some(is_default) = patch.is_default {
            self.is_default = is_default;
        }
        if let Some(total) = patch.total_filters_applied {
            self.total_filters_applied = Some(total);
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSnapshot {
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    #[serde(rename = "pageId")]
    pub page_id: String,
    #[serde(rename = "table_name")]
    pub name: String,
    #[serde(rename = "table_description")]
    pub description: String,
    #[serde(rename = "data")]
    pub payload: String,
    #[serde(rename = "allState", skip_serializing_if = "Option::is_none")]
    pub all_state: Option<String>,
    #[serde(rename = "table_default", serialize_with = "wire::serialize_flag")]
    pub is_default: bool,
    #[serde(rename = "totalFiltersApplied", skip_serializing_if = "Option::is_none")]
    pub total_filters_applied: Option<i64>,
}

impl NewSnapshot {
    /// Start a create request for `kind`.
    ///
    /// Filter snapshots get `total_filters_applied` derived from the
    /// payload here, once.
    pub fn new(
        kind: ViewKind,
        owner_id: UserId,
        page_id: impl Into<String>,
        name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        let payload = payload.into();
        let total_filters_applied = match kind {
            ViewKind::Filters => Some(count_filters(&payload) as i64),
            ViewKind::Columns => None,
        };
        Self {
            owner_id,
            page_id: page_id.into(),
            name: name.into(),
            description: String::new(),
            payload,
            all_state: None,
            is_default: false,
            total_filters_applied,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_all_state(mut self, all_state: impl Into<String>) -> Self {
        self.all_state = Some(all_state.into());
        self
    }

    /// Check name, description and page id before the request is sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_page_id(&self.page_id)?;
        validate_view_name(&self.name)?;
        validate_description(&self.description)
    }
}

/// DTO for partially updating a snapshot. Omitted fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotPatch {
    #[serde(rename = "table_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "table_description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(rename = "allState", skip_serializing_if = "Option::is_none")]
    pub all_state: Option<String>,
    #[serde(
        rename = "table_default",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::serialize_opt_flag"
    )]
    pub is_default: Option<bool>,
    #[serde(rename = "totalFiltersApplied", skip_serializing_if = "Option::is_none")]
    pub total_filters_applied: Option<i64>,
}

impl SnapshotPatch {
    pub fn default_flag(is_default: bool) -> Self {
        Self {
            is_default: Some(is_default),
            ..Self::default()
        }
    }

    /// Patch that replaces the payload of a snapshot of `kind`.
    pub fn payload(kind: ViewKind, payload: impl Into<String>, all_state: Option<String>) -> Self {
        let payload = payload.into();
        let total_filters_applied = match kind {
            ViewKind::Filters => Some(count_filters(&payload) as i64),
            ViewKind::Columns => None,
        };
        Self {
            payload: Some(payload),
            all_state,
            total_filters_applied,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate any metadata fields this patch carries.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            validate_view_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Validation functions
   -------------------------------------------------------------------------- */

/// Validate a view name: non-blank and within length limit.
pub fn validate_view_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "View name must not be empty".to_string(),
        ));
    }
    let len = name.chars().count();
    if len > MAX_VIEW_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "View name too long: {len} chars (max {MAX_VIEW_NAME_LEN})"
        )));
    }
    Ok(())
}

/// Validate a description length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description too long: {len} chars (max {MAX_DESCRIPTION_LEN})"
        )));
    }
    Ok(())
}

/// Validate a page key.
pub fn validate_page_id(page_id: &str) -> Result<(), CoreError> {
    if page_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Page id must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Number of top-level keys in a filter payload.
///
/// Anything that is not a JSON object counts as zero filters.
pub fn count_filters(payload: &str) -> usize {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::Object(map)) => map.len(),
        _ => 0,
    }
}
