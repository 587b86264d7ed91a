//! The saved-view state machine for one grid on one page.
//!
//! ```text
//! Uninitialized --grid ready--> Resolving --token or snapshot--> Applied
//!                                        \--nothing to apply---> Idle
//! Idle    --save as new--> Applied
//! Applied --switch / update--> Applied
//! Applied --reset to default--> Idle
//! ```
//!
//! Edits the user makes directly on the grid never change the state and
//! are never saved implicitly; they only reach the backend through
//! [`ViewController::update_current`] or [`ViewController::save_as_new`].

use gridview_core::codec;
use gridview_core::grid::{parse_columns, parse_filters, pivot_mode, SharedGridState};
use gridview_core::resolve::Resolution;
use gridview_core::snapshot::{ViewKind, ViewSnapshot};
use gridview_core::types::DbId;

use crate::editor::SnapshotEditor;
use crate::error::ViewError;
use crate::grid::GridSurface;
use crate::store::{NewView, SettingsStore};

/// Where the state currently shown in the grid came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    /// A named, persisted snapshot.
    Snapshot(DbId),
    /// A deep-link token; there is nothing to update in place.
    Token,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    Resolving,
    /// The grid shows its unmodified configuration.
    Idle,
    Applied(ActiveView),
}

/// Drives a [`GridSurface`] from a [`SettingsStore`] for one view kind.
pub struct ViewController {
    store: SettingsStore,
    state: ViewState,
}

impl ViewController {
    pub fn new(store: SettingsStore) -> Self {
        Self {
            store,
            state: ViewState::Uninitialized,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn kind(&self) -> ViewKind {
        self.store.kind()
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// The active named snapshot, if the state came from one.
    pub fn active_snapshot(&self) -> Option<&ViewSnapshot> {
        match self.state {
            ViewState::Applied(ActiveView::Snapshot(id)) => self.store.get(id),
            _ => None,
        }
    }

    /// Load the page's views and push the right state into the grid.
    ///
    /// A readable `token` carrying state for this kind wins over any saved
    /// view and leaves every default flag alone. Otherwise `explicit_id`,
    /// then the user's default, is applied. An unreadable token or
    /// snapshot payload degrades to the next option instead of failing.
    /// If the page cannot be loaded the error is returned, the grid is left
    /// untouched and the controller is `Idle`. When the failed page differs
    /// from the one already loaded, the store is unloaded so no view of the
    /// old page can be applied to or saved from this grid.
    pub async fn on_grid_ready<G: GridSurface + ?Sized>(
        &mut self,
        grid: &mut G,
        page_id: &str,
        explicit_id: Option<DbId>,
        token: Option<&str>,
    ) -> Result<ViewState, ViewError> {
        self.state = ViewState::Resolving;

        if let Err(e) = self.store.load_for_page(page_id).await {
            tracing::error!(kind = %self.kind(), page_id, error = %e, "Failed to load saved views");
            if self.store.page_id() != Some(page_id) {
                self.store.unload();
            }
            self.state = ViewState::Idle;
            return Err(e);
        }

        if let Some(shared) = codec::decompress::<SharedGridState>(token) {
            if self.apply_shared(grid, &shared) {
                tracing::info!(kind = %self.kind(), page_id, "Applied grid state from link");
                self.state = ViewState::Applied(ActiveView::Token);
                return Ok(self.state);
            }
        }

        let resolved = self
            .store
            .resolve_active(explicit_id)
            .map(|(snapshot, why)| (snapshot.clone(), why));

        self.state = match resolved {
            Some((snapshot, why)) => match apply_snapshot(self.kind(), grid, &snapshot) {
                Ok(()) => {
                    tracing::info!(
                        kind = %self.kind(),
                        page_id,
                        id = snapshot.id,
                        explicit = why == Resolution::Explicit,
                        "Applied saved view",
                    );
                    ViewState::Applied(ActiveView::Snapshot(snapshot.id))
                }
                Err(e) => {
                    tracing::warn!(kind = %self.kind(), id = snapshot.id, error = %e, "Skipping unreadable saved view");
                    ViewState::Idle
                }
            },
            None => ViewState::Idle,
        };
        Ok(self.state)
    }

    /// Encode the live grid (columns and filters) as a share token.
    pub fn capture_current_state<G: GridSurface + ?Sized>(&self, grid: &G) -> Result<String, ViewError> {
        let state = SharedGridState {
            columns: Some(grid.column_state()),
            filters: Some(grid.filter_model()),
        };
        Ok(codec::compress(&state)?)
    }

    /// Save the live grid state as a new named view and make it active.
    pub async fn save_as_new<G: GridSurface + ?Sized>(
        &mut self,
        grid: &G,
        name: &str,
        description: &str,
    ) -> Result<ViewSnapshot, ViewError> {
        let (payload, all_state) = capture_payload(self.kind(), grid)?;
        let snapshot = self
            .store
            .save(NewView {
                name: name.to_string(),
                description: description.to_string(),
                payload,
                all_state,
            })
            .await?;
        self.state = ViewState::Applied(ActiveView::Snapshot(snapshot.id));
        Ok(snapshot)
    }

    /// Overwrite the active named view with the live grid state.
    pub async fn update_current<G: GridSurface + ?Sized>(&mut self, grid: &G) -> Result<(), ViewError> {
        let ViewState::Applied(ActiveView::Snapshot(id)) = self.state else {
            return Err(ViewError::NoActiveSnapshot);
        };
        let (payload, all_state) = capture_payload(self.kind(), grid)?;
        self.store.overwrite(id, payload, all_state).await
    }

    /// Drop the active view and return the grid to its defaults.
    ///
    /// Both kinds restore the default column layout. Columns also leave
    /// pivot mode; filters also clear the filter model.
    pub fn reset_to_default<G: GridSurface + ?Sized>(&mut self, grid: &mut G) {
        match self.kind() {
            ViewKind::Columns => {
                grid.set_pivot_mode(false);
                grid.reset_columns();
            }
            ViewKind::Filters => {
                grid.set_filter_model(None);
                grid.reset_columns();
            }
        }
        self.state = ViewState::Idle;
    }

    /// Clear every filter. A filter controller also drops its active view.
    pub fn clear_filters<G: GridSurface + ?Sized>(&mut self, grid: &mut G) {
        grid.set_filter_model(None);
        if self.kind() == ViewKind::Filters {
            self.state = ViewState::Idle;
        }
    }

    /// Apply another loaded view and make it active.
    pub fn switch_view<G: GridSurface + ?Sized>(
        &mut self,
        grid: &mut G,
        id: DbId,
    ) -> Result<(), ViewError> {
        let snapshot = self
            .store
            .get(id)
            .cloned()
            .ok_or(ViewError::UnknownSnapshot(id))?;
        apply_snapshot(self.kind(), grid, &snapshot)?;
        self.state = ViewState::Applied(ActiveView::Snapshot(id));
        Ok(())
    }

    /// Make `id` the exclusive default for the page.
    pub async fn set_default(&mut self, id: DbId) -> Result<(), ViewError> {
        self.store.set_default(id).await
    }

    /// Set or unset the default flag on `id`. Returns the new flag.
    pub async fn toggle_default(&mut self, id: DbId) -> Result<bool, ViewError> {
        self.store.toggle_default(id).await
    }

    /// Delete a saved view. Deleting the active one leaves the grid as it
    /// is and the controller `Idle`.
    pub async fn remove(&mut self, id: DbId) -> Result<(), ViewError> {
        self.store.remove(id).await?;
        if self.state == ViewState::Applied(ActiveView::Snapshot(id)) {
            self.state = ViewState::Idle;
        }
        Ok(())
    }

    /// Open the bulk editor over the user's views.
    pub fn open_editor(&self) -> SnapshotEditor {
        SnapshotEditor::open(&self.store)
    }

    /// Take the replacement list an editor handed back.
    pub fn adopt_edits(&mut self, snapshots: Vec<ViewSnapshot>) {
        self.store.replace_all(snapshots);
        if let ViewState::Applied(ActiveView::Snapshot(id)) = self.state {
            if self.store.get(id).is_none() {
                self.state = ViewState::Idle;
            }
        }
    }

    /// Apply this kind's part of a shared state. Returns `false` if the
    /// token carried nothing for this kind.
    fn apply_shared<G: GridSurface + ?Sized>(&self, grid: &mut G, shared: &SharedGridState) -> bool {
        match self.kind() {
            ViewKind::Columns => match &shared.columns {
                Some(columns) => {
                    grid.apply_column_state(columns);
                    true
                }
                None => false,
            },
            ViewKind::Filters => match &shared.filters {
                Some(filters) => {
                    grid.set_filter_model(Some(filters));
                    true
                }
                None => false,
            },
        }
    }
}

/// Push a snapshot's payload into the grid.
fn apply_snapshot<G: GridSurface + ?Sized>(
    kind: ViewKind,
    grid: &mut G,
    snapshot: &ViewSnapshot,
) -> Result<(), ViewError> {
    let payload_error = |source| ViewError::Payload {
        id: snapshot.id,
        source,
    };
    match kind {
        ViewKind::Columns => {
            let columns = parse_columns(&snapshot.payload).map_err(payload_error)?;
            if snapshot.all_state.as_deref().is_some_and(pivot_mode) {
                grid.set_pivot_mode(true);
            }
            grid.apply_column_state(&columns);
        }
        ViewKind::Filters => {
            let filters = parse_filters(&snapshot.payload).map_err(payload_error)?;
            grid.set_filter_model(Some(&filters));
        }
    }
    Ok(())
}

/// Serialize the live grid state for `kind`: the payload plus, for column
/// views, the whole-grid state.
fn capture_payload<G: GridSurface + ?Sized>(
    kind: ViewKind,
    grid: &G,
) -> Result<(String, Option<String>), ViewError> {
    match kind {
        ViewKind::Columns => {
            let payload = serde_json::to_string(&grid.column_state())?;
            let all_state = grid
                .grid_state()
                .map(|state| serde_json::to_string(&state))
                .transpose()?;
            Ok((payload, all_state))
        }
        ViewKind::Filters => Ok((serde_json::to_string(&grid.filter_model())?, None)),
    }
}
