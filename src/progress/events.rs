//! Progress events
//!
//! Facts emitted by the engine for the presentation layer to consume.
//! There is no listener registration; the engine queues events and the
//! consumer drains them each frame.

/// An event produced by a successful progress mutation
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A new item was found. Carries everything a goal panel needs to
    /// animate the item to its slot and update the found/total counter.
    ItemFound {
        level_id: String,
        group_id: String,
        item_id: String,
        /// Authored world position of the found item
        position: (f32, f32),
        group_found: usize,
        group_total: usize,
    },
    /// Every group in the level reached its total. Fired exactly once per
    /// play session; triggers the reward screen and implicitly unlocks the
    /// next level through the derived unlock chain.
    LevelCompleted {
        level_id: String,
        stars: u8,
        coins_awarded: u32,
        elapsed_secs: f32,
    },
}
