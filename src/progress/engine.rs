//! Progress engine
//!
//! The core logic: records item finds against the active play session,
//! evaluates completion, computes the star rating, and writes every change
//! through the progress store.

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use crate::content::{LevelCatalog, LevelDefinition};

use super::events::ProgressEvent;
use super::stars::{stars_for_time, UNTIMED_STARS};
use super::store::LevelProgressStore;
use super::unlocks;

/// Caller contract violations; these indicate a content/data mismatch and
/// are surfaced immediately rather than ignored
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgressError {
    #[error("item '{item}' is not part of level '{level}'")]
    UnknownItem { level: String, item: String },
    #[error("unknown level '{level}'")]
    UnknownLevel { level: String },
    #[error("level '{level}' is locked")]
    LevelLocked { level: String },
    #[error("no active level session")]
    NoActiveSession,
}

/// Result of a find attempt against a valid item
#[derive(Debug, Clone, PartialEq)]
pub enum FindOutcome {
    /// The item was already found this session; nothing changed.
    /// Double-delivered touch events land here.
    AlreadyFound,
    /// The item was newly found
    Found {
        group_id: String,
        group_found: usize,
        group_total: usize,
        /// Whether this find completed the level
        completed: bool,
    },
}

/// Transient state of one play-through of a level.
///
/// The found-set here is a session-local overlay over the persisted record:
/// an uncompleted level resumes from its persisted finds, a completed level
/// replays from scratch. The persisted set is never reset by a replay.
#[derive(Debug, Clone)]
pub struct LevelSession {
    level: LevelDefinition,
    found: HashSet<String>,
    started: Instant,
    completed_this_session: bool,
}

impl LevelSession {
    /// The level being played
    pub fn level(&self) -> &LevelDefinition {
        &self.level
    }

    /// Items found so far this session
    pub fn found_items(&self) -> &HashSet<String> {
        &self.found
    }

    /// Found count for one group this session
    pub fn group_found(&self, group_id: &str) -> usize {
        self.level
            .group(group_id)
            .map(|g| {
                g.items
                    .iter()
                    .filter(|i| self.found.contains(&i.item_id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Whether every group's found count has reached its total
    pub fn is_complete(&self) -> bool {
        self.level
            .groups
            .iter()
            .all(|g| self.group_found(&g.group_id) == g.total_items())
    }

    /// Seconds since this session started
    pub fn elapsed_secs(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

/// The authoritative mutator of level progress
pub struct ProgressEngine {
    store: LevelProgressStore,
    events: VecDeque<ProgressEvent>,
}

impl ProgressEngine {
    pub fn new(store: LevelProgressStore) -> Self {
        Self {
            store,
            events: VecDeque::new(),
        }
    }

    pub fn store(&self) -> &LevelProgressStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LevelProgressStore {
        &mut self.store
    }

    /// Begin a play session for a level.
    ///
    /// An uncompleted level resumes with its persisted finds already marked;
    /// a completed level replays with an empty overlay while its permanent
    /// record stays untouched.
    pub fn begin_session(&mut self, level: &LevelDefinition) -> LevelSession {
        let progress = self.store.get(&level.level_id);
        let found = if progress.is_completed {
            HashSet::new()
        } else {
            progress
                .found_items
                .iter()
                .filter(|id| level.find_item(id).is_some())
                .cloned()
                .collect()
        };
        let mut session = LevelSession {
            level: level.clone(),
            found,
            started: Instant::now(),
            completed_this_session: false,
        };

        // The final find of a run persists before the completion does, so a
        // process kill between the two writes leaves every item recorded
        // with the completion flag still unset. Finish the transition now,
        // then hand back a replay session like any completed level.
        if !session.found.is_empty() && session.is_complete() {
            self.recover_completion(&session.level);
            session.found.clear();
        }

        log::info!(
            "Session started for level '{}' ({}/{} items found)",
            session.level.level_id,
            session.found.len(),
            session.level.total_items()
        );
        session
    }

    /// Complete a level whose run was interrupted after its last find.
    ///
    /// The interrupted run's timing is lost, so a timed level gets the
    /// minimum rating and the best time stays unset; a replay can improve
    /// both through the usual ratchets.
    fn recover_completion(&mut self, level: &LevelDefinition) {
        let stars = if level.time_budget_secs.is_some() {
            1
        } else {
            UNTIMED_STARS
        };
        let coins = level.coins_reward;

        log::warn!(
            "Level '{}' had every item found but no completion recorded, repairing",
            level.level_id
        );
        self.store
            .record_completion(&level.level_id, stars, 0.0, coins);
        self.events.push_back(ProgressEvent::LevelCompleted {
            level_id: level.level_id.clone(),
            stars,
            coins_awarded: coins,
            elapsed_secs: 0.0,
        });
    }

    /// Record that the player located an item.
    ///
    /// Idempotent per session: re-delivery of an already-found item is a
    /// no-op. A newly found item is persisted immediately and emits an
    /// `ItemFound` event; if it was the last one, the completion runs and
    /// emits `LevelCompleted` exactly once.
    pub fn record_find(
        &mut self,
        session: &mut LevelSession,
        item_id: &str,
    ) -> Result<FindOutcome, ProgressError> {
        let (group_id, group_total, position) = match session.level.find_item(item_id) {
            Some((group, item)) => (group.group_id.clone(), group.total_items(), item.position),
            None => {
                return Err(ProgressError::UnknownItem {
                    level: session.level.level_id.clone(),
                    item: item_id.to_string(),
                })
            }
        };

        if session.found.contains(item_id) {
            return Ok(FindOutcome::AlreadyFound);
        }

        session.found.insert(item_id.to_string());
        self.store.record_find(&session.level.level_id, item_id);

        let group_found = session.group_found(&group_id);
        self.events.push_back(ProgressEvent::ItemFound {
            level_id: session.level.level_id.clone(),
            group_id: group_id.clone(),
            item_id: item_id.to_string(),
            position,
            group_found,
            group_total,
        });

        let completed = !session.completed_this_session && session.is_complete();
        if completed {
            self.complete(session);
        }

        Ok(FindOutcome::Found {
            group_id,
            group_found,
            group_total,
            completed,
        })
    }

    /// Pull all pending events. The presentation layer calls this each frame.
    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        self.events.drain(..).collect()
    }

    /// Whether a level is currently unlocked, derived from the live table
    pub fn is_unlocked(&self, catalog: &LevelCatalog, level_id: &str) -> bool {
        unlocks::is_unlocked(level_id, &catalog.ordered_ids(), self.store.table())
    }

    /// Index of the first locked level in catalog order
    pub fn first_locked(&self, catalog: &LevelCatalog) -> Option<usize> {
        unlocks::first_locked(&catalog.ordered_ids(), self.store.table())
    }

    fn complete(&mut self, session: &mut LevelSession) {
        let elapsed = session.elapsed_secs();
        let stars = stars_for_time(elapsed, session.level.time_budget_secs);
        let coins = session.level.coins_reward;

        self.store
            .record_completion(&session.level.level_id, stars, elapsed, coins);
        session.completed_this_session = true;

        log::info!(
            "Level '{}' completed in {:.1}s ({} stars, {} coins)",
            session.level.level_id,
            elapsed,
            stars,
            coins
        );
        self.events.push_back(ProgressEvent::LevelCompleted {
            level_id: session.level.level_id.clone(),
            stars,
            coins_awarded: coins,
            elapsed_secs: elapsed,
        });
    }
}
