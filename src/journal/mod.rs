pub mod search;
pub mod store;
pub mod types;

pub use store::{EntryStore, SharedStore};
pub use types::{EntryPatch, JournalEntry};

/// Failures of the entry store's own operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A required field is missing or a value has the wrong shape.
    #[error("{0}")]
    Validation(String),
    /// No entry carries the requested id.
    #[error("Entry not found: {0}")]
    NotFound(String),
}
