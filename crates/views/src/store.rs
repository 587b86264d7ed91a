//! Per-page cache of a user's saved views.

use std::sync::Arc;

use gridview_client::SettingsBackend;
use gridview_core::resolve::{self, Resolution};
use gridview_core::snapshot::{validate_page_id, NewSnapshot, SnapshotPatch, ViewKind, ViewSnapshot};
use gridview_core::types::{DbId, UserId};

use crate::error::ViewError;

/// Everything needed to save the current grid state as a new view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewView {
    pub name: String,
    pub description: String,
    /// Serialized column state or filter model.
    pub payload: String,
    /// Whole-grid state (column family only).
    pub all_state: Option<String>,
}

/// Cache of the session user's snapshots of one kind for one page.
///
/// The cache is replaced wholesale on every [`load_for_page`] and is never
/// carried over to a different page. Backend failures leave it untouched.
///
/// [`load_for_page`]: SettingsStore::load_for_page
pub struct SettingsStore {
    backend: Arc<dyn SettingsBackend>,
    kind: ViewKind,
    user_id: UserId,
    page_id: Option<String>,
    /// Snapshots the session user owns.
    mine: Vec<ViewSnapshot>,
    /// Snapshots other users own that the backend made visible.
    shared: Vec<ViewSnapshot>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn SettingsBackend>, kind: ViewKind, user_id: UserId) -> Self {
        Self {
            backend,
            kind,
            user_id,
            page_id: None,
            mine: Vec::new(),
            shared: Vec::new(),
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    /// The session user's snapshots, in backend order.
    pub fn snapshots(&self) -> &[ViewSnapshot] {
        &self.mine
    }

    /// Other users' snapshots for the page.
    pub fn shared(&self) -> &[ViewSnapshot] {
        &self.shared
    }

    /// Look a snapshot up by id among both own and shared rows.
    pub fn get(&self, id: DbId) -> Option<&ViewSnapshot> {
        self.mine.iter().chain(&self.shared).find(|s| s.id == id)
    }

    pub fn is_mine(&self, id: DbId) -> bool {
        self.mine.iter().any(|s| s.id == id)
    }

    pub(crate) fn backend(&self) -> &Arc<dyn SettingsBackend> {
        &self.backend
    }

    /// Fetch the snapshots for `page_id`, replacing the cache.
    pub async fn load_for_page(&mut self, page_id: &str) -> Result<(), ViewError> {
        validate_page_id(page_id)?;

        let rows = self.backend.list(self.kind, self.user_id, page_id).await?;
        let (mine, shared) = resolve::partition_by_owner(rows, self.user_id);

        let defaults = resolve::default_ids(&mine);
        if defaults.len() > 1 {
            tracing::warn!(
                kind = %self.kind,
                page_id,
                ?defaults,
                "More than one saved view is flagged as default; the first one wins",
            );
        }

        tracing::info!(
            kind = %self.kind,
            page_id,
            own = mine.len(),
            shared = shared.len(),
            "Loaded saved views",
        );

        self.page_id = Some(page_id.to_string());
        self.mine = mine;
        self.shared = shared;
        Ok(())
    }

    /// Decide which snapshot should be active: `explicit_id` if it is
    /// cached, else the user's default, else none.
    pub fn resolve_active(&self, explicit_id: Option<DbId>) -> Option<(&ViewSnapshot, Resolution)> {
        resolve::resolve_active(&self.mine, &self.shared, explicit_id)
    }

    /// Make `id` the only default for this page.
    ///
    /// Clears the flag on every other default with one `update` each, then
    /// sets it on `id` with one more. The cache is patched only after all
    /// calls have succeeded.
    pub async fn set_default(&mut self, id: DbId) -> Result<(), ViewError> {
        self.require_mine(id)?;

        let previous: Vec<DbId> = resolve::default_ids(&self.mine)
            .into_iter()
            .filter(|other| *other != id)
            .collect();
        for other in &previous {
            self.backend
                .update(self.kind, *other, &SnapshotPatch::default_flag(false))
                .await?;
        }
        self.backend
            .update(self.kind, id, &SnapshotPatch::default_flag(true))
            .await?;

        for snapshot in &mut self.mine {
            snapshot.is_default = snapshot.id == id;
        }
        tracing::info!(kind = %self.kind, id, cleared = ?previous, "Set default saved view");
        Ok(())
    }

    /// Remove the default flag from `id`.
    pub async fn clear_default(&mut self, id: DbId) -> Result<(), ViewError> {
        self.require_mine(id)?;

        self.backend
            .update(self.kind, id, &SnapshotPatch::default_flag(false))
            .await?;

        if let Some(snapshot) = self.mine.iter_mut().find(|s| s.id == id) {
            snapshot.is_default = false;
        }
        tracing::info!(kind = %self.kind, id, "Cleared default saved view");
        Ok(())
    }

    /// Flip the default flag on `id`. Returns the new flag.
    pub async fn toggle_default(&mut self, id: DbId) -> Result<bool, ViewError> {
        let is_default = self.require_mine(id)?.is_default;
        if is_default {
            self.clear_default(id).await?;
        } else {
            self.set_default(id).await?;
        }
        Ok(!is_default)
    }

    /// Persist a new snapshot for the loaded page and cache it.
    pub async fn save(&mut self, view: NewView) -> Result<ViewSnapshot, ViewError> {
        let page_id = self.page_id.clone().ok_or(ViewError::NoPage)?;

        let mut dto = NewSnapshot::new(self.kind, self.user_id, page_id, view.name, view.payload)
            .with_description(view.description);
        dto.all_state = view.all_state;
        dto.validate()?;

        let id = self.backend.create(self.kind, &dto).await?;
        let snapshot = ViewSnapshot::from_new(id, &dto);
        self.mine.push(snapshot.clone());

        tracing::info!(kind = %self.kind, id, name = %snapshot.name, "Saved new view");
        Ok(snapshot)
    }

    /// Replace the payload of `id` and patch the cached copy to match.
    pub async fn overwrite(
        &mut self,
        id: DbId,
        payload: String,
        all_state: Option<String>,
    ) -> Result<(), ViewError> {
        self.require_mine(id)?;

        let patch = SnapshotPatch::payload(self.kind, payload, all_state);
        self.backend.update(self.kind, id, &patch).await?;
        self.patch_cached(id, &patch);

        tracing::info!(kind = %self.kind, id, "Updated saved view payload");
        Ok(())
    }

    /// Change the name and optionally the description of `id`.
    pub async fn rename(
        &mut self,
        id: DbId,
        name: String,
        description: Option<String>,
    ) -> Result<(), ViewError> {
        self.require_mine(id)?;

        let patch = SnapshotPatch {
            name: Some(name),
            description,
            ..SnapshotPatch::default()
        };
        patch.validate()?;
        self.backend.update(self.kind, id, &patch).await?;
        self.patch_cached(id, &patch);
        Ok(())
    }

    /// Delete `id` on the backend and drop it from the cache.
    pub async fn remove(&mut self, id: DbId) -> Result<(), ViewError> {
        self.require_mine(id)?;

        self.backend.delete(self.kind, id).await?;
        self.mine.retain(|s| s.id != id);

        tracing::info!(kind = %self.kind, id, "Deleted saved view");
        Ok(())
    }

    /// Forget the loaded page and both caches.
    pub fn unload(&mut self) {
        self.page_id = None;
        self.mine.clear();
        self.shared.clear();
    }

    /// Adopt a full replacement list of the user's snapshots.
    pub fn replace_all(&mut self, snapshots: Vec<ViewSnapshot>) {
        self.mine = snapshots;
    }

    fn require_mine(&self, id: DbId) -> Result<&ViewSnapshot, ViewError> {
        if self.page_id.is_none() {
            return Err(ViewError::NoPage);
        }
        if let Some(snapshot) = self.mine.iter().find(|s| s.id == id) {
            return Ok(snapshot);
        }
        if self.shared.iter().any(|s| s.id == id) {
            return Err(ViewError::NotOwner(id));
        }
        Err(ViewError::UnknownSnapshot(id))
    }

    fn patch_cached(&mut self, id: DbId, patch: &SnapshotPatch) {
        if let Some(snapshot) = self.mine.iter_mut().find(|s| s.id == id) {
            snapshot.apply_patch(patch);
        }
    }
}
