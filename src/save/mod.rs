//! Persistence layer
//!
//! Key-value preference storage backing all saved progress.

pub mod prefs;

pub use prefs::{FilePrefs, MemoryPrefs, PersistError, PrefsBackend};
