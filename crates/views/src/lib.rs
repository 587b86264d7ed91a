//! Saved-view behaviour for data grids.
//!
//! [`SettingsStore`] caches one user's snapshots for one page and resolves
//! which should be active. [`ViewController`] drives a live grid through
//! the load/apply/save/reset cycle. [`SnapshotEditor`] stages bulk edits
//! to the saved list and hands a replacement list back to the controller.

pub mod controller;
pub mod editor;
pub mod error;
pub mod grid;
pub mod store;

pub use controller::{ActiveView, ViewController, ViewState};
pub use editor::{PendingCall, SnapshotEditor};
pub use error::ViewError;
pub use grid::{GridSurface, HeadlessGrid};
pub use store::{NewView, SettingsStore};
