//! Settings backend client.
//!
//! Defines the [`SettingsBackend`](backend::SettingsBackend) boundary the
//! view layer talks through, an HTTP implementation for the REST settings
//! endpoints and an in-memory implementation for tests and offline use.

pub mod backend;
pub mod config;
pub mod http;
pub mod memory;

pub use backend::{BackendError, SettingsBackend};
pub use config::ClientConfig;
pub use http::HttpSettingsBackend;
pub use memory::{BackendCall, MemoryBackend};
