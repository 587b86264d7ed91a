//! The collaborator boundary for persisted views.

use async_trait::async_trait;
use gridview_core::snapshot::{NewSnapshot, SnapshotPatch, ViewKind, ViewSnapshot};
use gridview_core::types::{DbId, UserId};

/// Errors from a settings backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The settings API returned a non-2xx status code.
    #[error("Settings API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The request body could not be built.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A 2xx response whose body could not be read.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The addressed snapshot does not exist.
    #[error("Snapshot {0} not found")]
    NotFound(DbId),

    /// The backend refused the call without reaching a server.
    #[error("Settings backend unavailable: {0}")]
    Unavailable(String),
}

/// CRUD operations on saved views, one family (`kind`) at a time.
///
/// Implementations are network-backed and may fail independently of any
/// client state. `update` merges the provided fields and does not echo
/// the row back. No call is retried here.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// All snapshots visible to `owner_id` on `page_id`, including rows
    /// other users own. Unpaginated.
    async fn list(
        &self,
        kind: ViewKind,
        owner_id: UserId,
        page_id: &str,
    ) -> Result<Vec<ViewSnapshot>, BackendError>;

    /// Persist a new snapshot, returning the server-assigned id.
    async fn create(&self, kind: ViewKind, snapshot: &NewSnapshot) -> Result<DbId, BackendError>;

    /// Merge `patch` into the stored row.
    async fn update(
        &self,
        kind: ViewKind,
        id: DbId,
        patch: &SnapshotPatch,
    ) -> Result<(), BackendError>;

    /// Remove the row permanently.
    async fn delete(&self, kind: ViewKind, id: DbId) -> Result<(), BackendError>;
}
