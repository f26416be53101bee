//! Short-name registry subsystem.
//!
//! # Data Flow
//! ```text
//! Registration flow (validated URI)
//!     → Registry::put (exclusive)
//!
//! Redirect-lookup flow → Registry::get
//! Form-display flow    → Registry::snapshot (sorted, point-in-time)
//! ```
//!
//! # Design Decisions
//! - One lock guards the whole map; writers and consistent readers serialize on it
//! - Last successful write for a name wins; there is no delete
//! - Volatile: entries live for the process lifetime only
//! - Injected into the router as `Arc<dyn Registry>` so tests can swap it

pub mod memory;

pub use memory::MemoryRegistry;

/// A registered short name and the URI it redirects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub short_name: String,
    pub long_uri: String,
}

/// Shared name → URI store.
pub trait Registry: Send + Sync {
    /// Look up the URI stored under `short_name`.
    fn get(&self, short_name: &str) -> Option<String>;

    /// Insert or overwrite the entry for `short_name`.
    fn put(&self, short_name: String, long_uri: String);

    /// All entries, sorted by short name ascending.
    fn snapshot(&self) -> Vec<Bookmark>;

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
