//! Star rating
//!
//! Maps completion time against a level's time budget to a star count.

/// Maximum stars a level can award
pub const MAX_STARS: u8 = 3;

/// Stars awarded for completing a level with no time budget configured.
/// Untimed levels always full-reward completion.
pub const UNTIMED_STARS: u8 = MAX_STARS;

/// Compute the star rating for a completion.
///
/// With a budget: finishing within half of it earns 3 stars, within three
/// quarters earns 2, anything slower earns 1. Completing always earns at
/// least one star.
pub fn stars_for_time(elapsed_secs: f32, budget_secs: Option<f32>) -> u8 {
    let budget = match budget_secs {
        Some(b) => b,
        None => return UNTIMED_STARS,
    };

    if elapsed_secs <= budget * 0.5 {
        3
    } else if elapsed_secs <= budget * 0.75 {
        2
    } else {
        1
    }
}
