//! The seam between saved views and a live grid.

use serde_json::{json, Value};

use gridview_core::grid::{ColumnState, FilterModel};

/// Operations a grid exposes to the saved-view layer.
pub trait GridSurface {
    /// Current column layout.
    fn column_state(&self) -> Vec<ColumnState>;

    /// Apply a column layout, including column order.
    fn apply_column_state(&mut self, columns: &[ColumnState]);

    /// Return columns to the grid's configured defaults.
    fn reset_columns(&mut self);

    /// Current filter model.
    fn filter_model(&self) -> FilterModel;

    /// Replace the filter model; `None` clears every filter.
    fn set_filter_model(&mut self, model: Option<&FilterModel>);

    /// Whole-grid state stored next to a column layout, if the grid has any.
    fn grid_state(&self) -> Option<Value> {
        None
    }

    fn set_pivot_mode(&mut self, _enabled: bool) {}
}

/// A grid with no rendering: holds column, filter and pivot state in
/// memory.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessGrid {
    default_columns: Vec<ColumnState>,
    columns: Vec<ColumnState>,
    filters: FilterModel,
    pivot_mode: bool,
}

impl HeadlessGrid {
    pub fn new(default_columns: Vec<ColumnState>) -> Self {
        Self {
            columns: default_columns.clone(),
            default_columns,
            filters: FilterModel::new(),
            pivot_mode: false,
        }
    }

    /// Grid with one default column per id.
    pub fn with_columns<I, S>(col_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(col_ids.into_iter().map(ColumnState::new).collect())
    }

    pub fn pivot_mode(&self) -> bool {
        self.pivot_mode
    }

    /// Mutable access to the live columns, as a user dragging and sorting
    /// would change them.
    pub fn columns_mut(&mut self) -> &mut Vec<ColumnState> {
        &mut self.columns
    }

    /// Mutable access to the live filters.
    pub fn filters_mut(&mut self) -> &mut FilterModel {
        &mut self.filters
    }
}

impl GridSurface for HeadlessGrid {
    fn column_state(&self) -> Vec<ColumnState> {
        self.columns.clone()
    }

    fn apply_column_state(&mut self, columns: &[ColumnState]) {
        self.columns = columns.to_vec();
    }

    fn reset_columns(&mut self) {
        self.columns = self.default_columns.clone();
    }

    fn filter_model(&self) -> FilterModel {
        self.filters.clone()
    }

    fn set_filter_model(&mut self, model: Option<&FilterModel>) {
        self.filters = model.cloned().unwrap_or_default();
    }

    fn grid_state(&self) -> Option<Value> {
        Some(json!({ "pivot": { "pivotMode": self.pivot_mode } }))
    }

    fn set_pivot_mode(&mut self, enabled: bool) {
        self.pivot_mode = enabled;
    }
}
