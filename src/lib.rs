pub mod client;
pub mod error;
pub mod gql;
pub mod mapping;
pub mod model;
pub mod preferences;
pub mod runners;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

// --- Library API for embedding ---

/// Convenience re-exports for hosts.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::preferences::{FileStore, MemoryStore, PreferenceStore, Preferences};
    pub use crate::runners::{SuwayomiSource, SuwayomiTracker};
    pub use crate::transport::ReqwestClient;
    pub use runner_interface::*;
}

pub use client::SuwayomiClient;
pub use error::{Error, Result};
pub use runners::{SuwayomiSource, SuwayomiTracker};
