//! Session control
//!
//! Owns the currently active level session and mediates the start-level /
//! return-to-menu transitions. All state changes delegate to the progress
//! engine; this layer only decides which level is in play.

use crate::content::LevelCatalog;
use crate::progress::{
    FindOutcome, LevelSession, ProgressEngine, ProgressError, ProgressEvent,
};

/// Per-level summary for a level-select screen
#[derive(Debug, Clone, PartialEq)]
pub struct LevelOverview {
    pub level_id: String,
    pub unlocked: bool,
    pub completed: bool,
    pub stars: u8,
    pub found: usize,
    pub total: usize,
}

/// The single owner of the engine, catalog, and active session.
///
/// Constructed once at process start and passed by reference to whatever
/// needs it; there are no global instances.
pub struct SessionController {
    catalog: LevelCatalog,
    engine: ProgressEngine,
    active: Option<LevelSession>,
}

impl SessionController {
    pub fn new(catalog: LevelCatalog, engine: ProgressEngine) -> Self {
        Self {
            catalog,
            engine,
            active: None,
        }
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &ProgressEngine {
        &self.engine
    }

    /// The session currently in play, if any
    pub fn active(&self) -> Option<&LevelSession> {
        self.active.as_ref()
    }

    /// One-time first-launch behavior: auto-start the first level.
    /// Returns the id of the started level, or None on any later launch.
    pub fn bootstrap(&mut self) -> Option<String> {
        if !self.engine.store().is_first_time() {
            return None;
        }
        self.engine.store_mut().mark_first_time_done();

        let first_id = self.catalog.first()?.level_id.clone();
        log::info!("First launch, auto-starting level '{}'", first_id);
        match self.start_level(&first_id) {
            Ok(()) => Some(first_id),
            Err(e) => {
                log::warn!("First-launch auto-start failed: {}", e);
                None
            }
        }
    }

    /// Restart the last-active level from a previous launch, if one was
    /// recorded and is still unlocked.
    pub fn resume(&mut self) -> Option<String> {
        let level_id = self.engine.store().current_level()?;
        match self.start_level(&level_id) {
            Ok(()) => Some(level_id),
            Err(e) => {
                log::warn!("Could not resume level '{}': {}", level_id, e);
                None
            }
        }
    }

    /// Start playing a level. Fails for unknown or locked levels.
    pub fn start_level(&mut self, level_id: &str) -> Result<(), ProgressError> {
        let level = match self.catalog.get(level_id) {
            Some(level) => level.clone(),
            None => {
                return Err(ProgressError::UnknownLevel {
                    level: level_id.to_string(),
                })
            }
        };
        if !self.engine.is_unlocked(&self.catalog, level_id) {
            return Err(ProgressError::LevelLocked {
                level: level_id.to_string(),
            });
        }

        self.engine.store_mut().set_current_level(level_id);
        self.active = Some(self.engine.begin_session(&level));
        Ok(())
    }

    /// Record a find against the active session
    pub fn record_find(&mut self, item_id: &str) -> Result<FindOutcome, ProgressError> {
        let session = self.active.as_mut().ok_or(ProgressError::NoActiveSession)?;
        self.engine.record_find(session, item_id)
    }

    /// Leave the active level. Progress is already written through, so
    /// nothing needs flushing here.
    pub fn return_to_menu(&mut self) {
        if let Some(session) = self.active.take() {
            log::info!("Left level '{}'", session.level().level_id);
        }
    }

    /// Drain pending progress events for the presentation layer
    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        self.engine.drain_events()
    }

    /// Per-level summaries in catalog order, for a level-select screen
    pub fn overviews(&self) -> Vec<LevelOverview> {
        self.catalog
            .iter()
            .map(|level| {
                let progress = self.engine.store().progress(&level.level_id);
                LevelOverview {
                    level_id: level.level_id.clone(),
                    unlocked: self.engine.is_unlocked(&self.catalog, &level.level_id),
                    completed: progress.map(|p| p.is_completed).unwrap_or(false),
                    stars: progress.map(|p| p.stars_earned).unwrap_or(0),
                    found: progress.map(|p| p.found_items.len()).unwrap_or(0),
                    total: level.total_items(),
                }
            })
            .collect()
    }
}
