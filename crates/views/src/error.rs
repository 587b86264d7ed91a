use gridview_client::BackendError;
use gridview_core::codec::CodecError;
use gridview_core::error::CoreError;
use gridview_core::types::DbId;

/// Errors from the saved-view layer.
///
/// Every variant leaves the store's cache and the controller's state as
/// they were before the failing call.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// A domain-level error (usually validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The settings backend rejected or failed the call.
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("No page has been loaded")]
    NoPage,

    #[error("Saved view {0} is not loaded for this page")]
    UnknownSnapshot(DbId),

    #[error("Saved view {0} belongs to another user")]
    NotOwner(DbId),

    /// The operation needs a named view to be active.
    #[error("No saved view is active")]
    NoActiveSnapshot,

    #[error("Saved view {id} has an unreadable payload: {source}")]
    Payload {
        id: DbId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize grid state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
