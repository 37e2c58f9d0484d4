//! Game module - session ownership and level transitions

mod session;

pub use session::{LevelOverview, SessionController};
