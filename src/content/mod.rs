//! Level content and external data loading
//!
//! This module handles the immutable level definitions and loading them
//! from external RON files, allowing for data-driven content.

pub mod level;
pub mod loader;

pub use level::{ContentError, ItemDefinition, ItemGroup, LevelDefinition};
pub use loader::{default_levels, export_default_levels, LevelCatalog};
