//! In-process settings backend.
//!
//! Keeps rows in memory per view family, assigns sequential ids and
//! records every call it receives. A failure can be scheduled for a future
//! call to exercise error paths.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use gridview_core::snapshot::{NewSnapshot, SnapshotPatch, ViewKind, ViewSnapshot};
use gridview_core::types::{DbId, UserId};

use crate::backend::{BackendError, SettingsBackend};

/// One call received by a [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    List {
        kind: ViewKind,
        owner_id: UserId,
        page_id: String,
    },
    Create {
        kind: ViewKind,
        snapshot: NewSnapshot,
    },
    Update {
        kind: ViewKind,
        id: DbId,
        patch: SnapshotPatch,
    },
    Delete {
        kind: ViewKind,
        id: DbId,
    },
}

#[derive(Default)]
struct MemoryState {
    rows: HashMap<ViewKind, Vec<ViewSnapshot>>,
    last_id: DbId,
    calls: Vec<BackendCall>,
    /// Number of calls left to succeed before one fails.
    fail_after: Option<usize>,
}

/// Settings backend backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows as if they already existed on the server.
    pub fn seed(&self, kind: ViewKind, rows: impl IntoIterator<Item = ViewSnapshot>) {
        let mut state = self.lock();
        for row in rows {
            state.last_id = state.last_id.max(row.id);
            state.rows.entry(kind).or_default().push(row);
        }
    }

    /// Current server-side rows of `kind`.
    pub fn rows(&self, kind: ViewKind) -> Vec<ViewSnapshot> {
        self.lock().rows.get(&kind).cloned().unwrap_or_default()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make the next call fail.
    pub fn fail_next(&self) {
        self.fail_after(0);
    }

    /// Let `successes` calls through, then fail the one after.
    pub fn fail_after(&self, successes: usize) {
        self.lock().fail_after = Some(successes);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call` and decide whether it should fail.
    fn admit(state: &mut MemoryState, call: BackendCall) -> Result<(), BackendError> {
        state.calls.push(call);
        match state.fail_after {
            Some(0) => {
                state.fail_after = None;
                Err(BackendError::Unavailable("injected failure".to_string()))
            }
            Some(n) => {
                state.fail_after = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn list(
        &self,
        kind: ViewKind,
        owner_id: UserId,
        page_id: &str,
    ) -> Result<Vec<ViewSnapshot>, BackendError> {
        let mut state = self.lock();
        Self::admit(
            &mut state,
            BackendCall::List {
                kind,
                owner_id,
                page_id: page_id.to_string(),
            },
        )?;
        Ok(state
            .rows
            .get(&kind)
            .map(|rows| rows.iter().filter(|r| r.page_id == page_id).cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, kind: ViewKind, snapshot: &NewSnapshot) -> Result<DbId, BackendError> {
        let mut state = self.lock();
        Self::admit(
            &mut state,
            BackendCall::Create {
                kind,
                snapshot: snapshot.clone(),
            },
        )?;
        state.last_id += 1;
        let id = state.last_id;
        state
            .rows
            .entry(kind)
            .or_default()
            .push(ViewSnapshot::from_new(id, snapshot));
        Ok(id)
    }

    async fn update(
        &self,
        kind: ViewKind,
        id: DbId,
        patch: &SnapshotPatch,
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::admit(
            &mut state,
            BackendCall::Update {
                kind,
                id,
                patch: patch.clone(),
            },
        )?;
        let row = state
            .rows
            .get_mut(&kind)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == id))
            .ok_or(BackendError::NotFound(id))?;
        row.apply_patch(patch);
        Ok(())
    }

    async fn delete(&self, kind: ViewKind, id: DbId) -> Result<(), BackendError> {
        let mut state = self.lock();
        Self::admit(&mut state, BackendCall::Delete { kind, id })?;
        let rows = state.rows.entry(kind).or_default();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(BackendError::NotFound(id));
        }
        Ok(())
    }
}
