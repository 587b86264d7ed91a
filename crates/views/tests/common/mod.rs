//! Shared fixtures for saved-view tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;

use gridview_client::{MemoryBackend, SettingsBackend};
use gridview_core::grid::{ColumnState, FilterModel, SortDirection};
use gridview_core::snapshot::{ViewKind, ViewSnapshot};
use gridview_core::types::{DbId, UserId};
use gridview_views::{HeadlessGrid, SettingsStore, ViewController};

pub const USER: UserId = 7;
pub const OTHER_USER: UserId = 8;
pub const PAGE: &str = "properties-list";

pub fn snapshot(id: DbId, owner: UserId, name: &str, payload: &str, is_default: bool) -> ViewSnapshot {
    ViewSnapshot {
        id,
        owner_id: owner,
        page_id: PAGE.to_string(),
        name: name.to_string(),
        description: String::new(),
        payload: payload.to_string(),
        all_state: None,
        is_default,
        total_filters_applied: None,
    }
}

pub fn by_state_filter() -> FilterModel {
    let mut model = FilterModel::new();
    model.insert(
        "state".into(),
        json!({"filterType": "text", "type": "equals", "filter": "NV"}),
    );
    model
}

pub fn active_only_filter() -> FilterModel {
    let mut model = FilterModel::new();
    model.insert(
        "status".into(),
        json!({"filterType": "set", "values": ["Active"]}),
    );
    model
}

/// The two filter views from the properties-list scenario: "By State"
/// (not default) and "Active Only" (default).
pub fn scenario_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    backend.seed(
        ViewKind::Filters,
        [
            snapshot(
                1,
                USER,
                "By State",
                &serde_json::to_string(&by_state_filter()).unwrap(),
                false,
            ),
            snapshot(
                2,
                USER,
                "Active Only",
                &serde_json::to_string(&active_only_filter()).unwrap(),
                true,
            ),
        ],
    );
    backend
}

pub fn store(backend: &Arc<MemoryBackend>, kind: ViewKind) -> SettingsStore {
    let backend: Arc<dyn SettingsBackend> = backend.clone();
    SettingsStore::new(backend, kind, USER)
}

pub fn controller(backend: &Arc<MemoryBackend>, kind: ViewKind) -> ViewController {
    ViewController::new(store(backend, kind))
}

pub fn grid() -> HeadlessGrid {
    HeadlessGrid::with_columns(["id", "name", "state", "status"])
}

pub fn sorted_column(col_id: &str, width: u32) -> ColumnState {
    let mut column = ColumnState::new(col_id);
    column.width = Some(width);
    column.sort = Some(SortDirection::Asc);
    column.sort_index = Some(0);
    column
}
