//! Which saved view should be active when a page loads.
//!
//! Precedence: an explicitly requested id (from the URL) that matches a
//! cached snapshot, then the caller's own snapshot flagged as default,
//! then nothing.

use crate::snapshot::ViewSnapshot;
use crate::types::{DbId, UserId};

/// Why a snapshot was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Requested by id.
    Explicit,
    /// Flagged as the user's default for the page.
    Default,
}

/// Pick the active snapshot.
///
/// `mine` are the caller's snapshots, `shared` are snapshots other users
/// own that the backend made visible. Only `mine` is consulted for the
/// default flag. If more than one of `mine` is flagged, the first in list
/// order wins.
pub fn resolve_active<'a>(
    mine: &'a [ViewSnapshot],
    shared: &'a [ViewSnapshot],
    explicit_id: Option<DbId>,
) -> Option<(&'a ViewSnapshot, Resolution)> {
    if let Some(id) = explicit_id {
        if let Some(found) = mine.iter().chain(shared).find(|s| s.id == id) {
            return Some((found, Resolution::Explicit));
        }
    }
    mine.iter()
        .find(|s| s.is_default)
        .map(|s| (s, Resolution::Default))
}

/// Split backend rows into the caller's own and everyone else's.
pub fn partition_by_owner(
    rows: Vec<ViewSnapshot>,
    user_id: UserId,
) -> (Vec<ViewSnapshot>, Vec<ViewSnapshot>) {
    rows.into_iter().partition(|row| row.owner_id == user_id)
}

/// Ids of every snapshot in `rows` flagged as default.
pub fn default_ids(rows: &[ViewSnapshot]) -> Vec<DbId> {
    rows.iter().filter(|s| s.is_default).map(|s| s.id).collect()
}
