//! Bulk editing of a user's saved views.
//!
//! The editor works on a copy of the store's list. Renames, description
//! changes, default flags and deletions are staged and only reach the
//! backend on [`SnapshotEditor::commit`], which returns the full
//! replacement list for [`ViewController::adopt_edits`].
//!
//! [`ViewController::adopt_edits`]: crate::controller::ViewController::adopt_edits

use std::sync::Arc;

use gridview_client::SettingsBackend;
use gridview_core::snapshot::{
    validate_description, validate_view_name, SnapshotPatch, ViewKind, ViewSnapshot,
};
use gridview_core::types::DbId;

use crate::error::ViewError;
use crate::store::SettingsStore;

/// A backend call the editor will make on commit.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingCall {
    Delete(DbId),
    Update(DbId, SnapshotPatch),
}

struct EditorRow {
    original: ViewSnapshot,
    current: ViewSnapshot,
    deleted: bool,
}

impl EditorRow {
    fn patch(&self) -> SnapshotPatch {
        let (was, now) = (&self.original, &self.current);
        SnapshotPatch {
            name: (was.name != now.name).then(|| now.name.clone()),
            description: (was.description != now.description).then(|| now.description.clone()),
            is_default: (was.is_default != now.is_default).then_some(now.is_default),
            ..SnapshotPatch::default()
        }
    }
}

pub struct SnapshotEditor {
    backend: Arc<dyn SettingsBackend>,
    kind: ViewKind,
    rows: Vec<EditorRow>,
}

impl SnapshotEditor {
    /// Start editing the user's snapshots currently cached in `store`.
    pub fn open(store: &SettingsStore) -> Self {
        let rows = store
            .snapshots()
            .iter()
            .map(|s| EditorRow {
                original: s.clone(),
                current: s.clone(),
                deleted: false,
            })
            .collect();
        Self {
            backend: Arc::clone(store.backend()),
            kind: store.kind(),
            rows,
        }
    }

    /// Rows still present after staged deletions, with staged edits.
    pub fn rows(&self) -> impl Iterator<Item = &ViewSnapshot> {
        self.rows.iter().filter(|r| !r.deleted).map(|r| &r.current)
    }

    /// Rows whose name or description contains `query`, ignoring case.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&ViewSnapshot> {
        let needle = query.trim().to_lowercase();
        self.rows()
            .filter(|s| {
                needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn rename(&mut self, id: DbId, name: &str) -> Result<(), ViewError> {
        validate_view_name(name)?;
        self.row_mut(id)?.current.name = name.to_string();
        Ok(())
    }

    pub fn describe(&mut self, id: DbId, description: &str) -> Result<(), ViewError> {
        validate_description(description)?;
        self.row_mut(id)?.current.description = description.to_string();
        Ok(())
    }

    /// Flag `id` as the default and unflag every other row.
    pub fn mark_default(&mut self, id: DbId) -> Result<(), ViewError> {
        self.row_mut(id)?;
        for row in self.rows.iter_mut().filter(|r| !r.deleted) {
            row.current.is_default = row.current.id == id;
        }
        Ok(())
    }

    pub fn unmark_default(&mut self, id: DbId) -> Result<(), ViewError> {
        self.row_mut(id)?.current.is_default = false;
        Ok(())
    }

    /// Stage a deletion.
    pub fn delete(&mut self, id: DbId) -> Result<(), ViewError> {
        self.row_mut(id)?.deleted = true;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending_calls().is_empty()
    }

    /// Calls a commit would make, deletions first.
    pub fn pending_calls(&self) -> Vec<PendingCall> {
        let deletes = self
            .rows
            .iter()
            .filter(|r| r.deleted)
            .map(|r| PendingCall::Delete(r.original.id));
        let updates = self
            .rows
            .iter()
            .filter(|r| !r.deleted)
            .map(|r| (r.original.id, r.patch()))
            .filter(|(_, patch)| !patch.is_empty())
            .map(|(id, patch)| PendingCall::Update(id, patch));
        deletes.chain(updates).collect()
    }

    /// Send every staged change and return the resulting list.
    ///
    /// Stops at the first failure and returns it; changes already sent
    /// stay sent, and the caller keeps its previous list.
    pub async fn commit(self) -> Result<Vec<ViewSnapshot>, ViewError> {
        let calls = self.pending_calls();
        for call in &calls {
            match call {
                PendingCall::Delete(id) => self.backend.delete(self.kind, *id).await?,
                PendingCall::Update(id, patch) => self.backend.update(self.kind, *id, patch).await?,
            }
        }
        tracing::info!(kind = %self.kind, calls = calls.len(), "Committed saved view edits");

        Ok(self
            .rows
            .into_iter()
            .filter(|r| !r.deleted)
            .map(|r| r.current)
            .collect())
    }

    fn row_mut(&mut self, id: DbId) -> Result<&mut EditorRow, ViewError> {
        self.rows
            .iter_mut()
            .find(|r| r.current.id == id && !r.deleted)
            .ok_or(ViewError::UnknownSnapshot(id))
    }
}
