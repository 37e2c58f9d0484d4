//! Level progress and completion
//!
//! The authoritative model of found items, completion, star ratings, coin
//! rewards, and the derived unlock chain.

pub mod engine;
pub mod events;
pub mod stars;
pub mod store;
pub mod unlocks;

pub use engine::{FindOutcome, LevelSession, ProgressEngine, ProgressError};
pub use events::ProgressEvent;
pub use stars::{stars_for_time, MAX_STARS, UNTIMED_STARS};
pub use store::{LevelProgress, LevelProgressStore};
pub use unlocks::{first_locked, is_unlocked};
