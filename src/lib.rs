//! Hiddengrove - a casual hidden-object game core
//!
//! The authoritative model of levels, item groups, found-item sets,
//! completion and star computation, unlock ordering, and persisted
//! progress across sessions. Rendering, input, and UI are external.

pub mod content;
pub mod game;
pub mod progress;
pub mod save;

// Re-export commonly used types
pub use content::{LevelCatalog, LevelDefinition};
pub use game::SessionController;
pub use progress::{FindOutcome, LevelProgressStore, ProgressEngine, ProgressEvent};
