//! Persisted level progress
//!
//! One record per level id, created lazily on first access and written
//! through to the prefs backend after every mutation. Play sessions on
//! mobile end by process kill more often than by clean exit, so persistence
//! is synchronous and immediate rather than batched.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::save::PrefsBackend;

/// Prefs key holding the serialized progress records
const LEVEL_PROGRESS_KEY: &str = "LevelProgress";
/// Prefs key holding the last-active level id
const CURRENT_LEVEL_KEY: &str = "CurrentLevel";
/// Prefs key gating the one-time first-launch auto-start
const FIRST_TIME_KEY: &str = "IsFirstTime";

/// Persisted progress for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level_id: String,
    pub is_completed: bool,
    /// Only ever ratchets upward, 0..=3
    pub stars_earned: u8,
    /// Best completion time in seconds; 0.0 until the first completion
    pub best_time: f32,
    /// Accumulates on every completion, never decremented
    pub coins_collected: u32,
    /// Every item id ever found in this level
    #[serde(default)]
    pub found_items: HashSet<String>,
}

impl LevelProgress {
    /// Fresh zero-value record for a level
    pub fn new(level_id: &str) -> Self {
        Self {
            level_id: level_id.to_string(),
            is_completed: false,
            stars_earned: 0,
            best_time: 0.0,
            coins_collected: 0,
            found_items: HashSet::new(),
        }
    }
}

/// Owner of the progress table and its persistence
pub struct LevelProgressStore {
    table: HashMap<String, LevelProgress>,
    prefs: Box<dyn PrefsBackend>,
}

impl LevelProgressStore {
    /// Create a store over the given backend, loading any existing records
    pub fn new(prefs: Box<dyn PrefsBackend>) -> Self {
        let mut store = Self {
            table: HashMap::new(),
            prefs,
        };
        store.load();
        store
    }

    /// Get the progress for a level, creating a fresh record on first access
    pub fn get(&mut self, level_id: &str) -> &LevelProgress {
        self.table
            .entry(level_id.to_string())
            .or_insert_with(|| LevelProgress::new(level_id))
    }

    /// Non-creating read, for derived queries over the table
    pub fn progress(&self, level_id: &str) -> Option<&LevelProgress> {
        self.table.get(level_id)
    }

    /// The full progress table (read-only; mutation goes through this store)
    pub fn table(&self) -> &HashMap<String, LevelProgress> {
        &self.table
    }

    /// Record an item find. Returns true if the item was newly inserted.
    /// Persists immediately on insertion.
    pub fn record_find(&mut self, level_id: &str, item_id: &str) -> bool {
        let progress = self
            .table
            .entry(level_id.to_string())
            .or_insert_with(|| LevelProgress::new(level_id));
        let inserted = progress.found_items.insert(item_id.to_string());
        if inserted {
            self.save();
        }
        inserted
    }

    /// Record a completion: ratchet stars, keep the best time, accumulate
    /// the coin reward, mark completed, persist.
    pub fn record_completion(&mut self, level_id: &str, stars: u8, time_secs: f32, coins: u32) {
        let progress = self
            .table
            .entry(level_id.to_string())
            .or_insert_with(|| LevelProgress::new(level_id));
        progress.is_completed = true;
        progress.stars_earned = progress.stars_earned.max(stars);
        progress.best_time = if progress.best_time == 0.0 {
            time_secs
        } else {
            progress.best_time.min(time_secs)
        };
        progress.coins_collected += coins;
        self.save();
    }

    /// Serialize the whole table to the prefs backend and flush.
    ///
    /// Records are sorted by level id so the persisted blob is stable. A
    /// failed flush is logged and swallowed; the in-memory table stays
    /// authoritative.
    pub fn save(&mut self) {
        let mut records: Vec<&LevelProgress> = self.table.values().collect();
        records.sort_by(|a, b| a.level_id.cmp(&b.level_id));

        match serde_json::to_string(&records) {
            Ok(json) => {
                self.prefs.write(LEVEL_PROGRESS_KEY, json);
                if let Err(e) = self.prefs.flush() {
                    log::warn!("Failed to persist progress: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize progress: {}", e),
        }
    }

    /// Load the table from the prefs backend.
    ///
    /// A missing key is a fresh install, not an error. A malformed blob is
    /// discarded with a warning; losing progress beats a boot loop.
    pub fn load(&mut self) {
        let blob = match self.prefs.read(LEVEL_PROGRESS_KEY) {
            Some(blob) if !blob.is_empty() => blob,
            _ => {
                self.table = HashMap::new();
                return;
            }
        };

        match serde_json::from_str::<Vec<LevelProgress>>(&blob) {
            Ok(records) => {
                self.table = records
                    .into_iter()
                    .map(|p| (p.level_id.clone(), p))
                    .collect();
                log::info!("Loaded progress for {} levels", self.table.len());
            }
            Err(e) => {
                log::warn!("Failed to parse saved progress: {}, starting fresh", e);
                self.table = HashMap::new();
            }
        }
    }

    /// Last-active level id, for resuming on next launch
    pub fn current_level(&self) -> Option<String> {
        self.prefs.read(CURRENT_LEVEL_KEY).filter(|s| !s.is_empty())
    }

    /// Persist the last-active level id
    pub fn set_current_level(&mut self, level_id: &str) {
        self.prefs.write(CURRENT_LEVEL_KEY, level_id.to_string());
        if let Err(e) = self.prefs.flush() {
            log::warn!("Failed to persist current level: {}", e);
        }
    }

    /// Whether this is the first ever launch
    pub fn is_first_time(&self) -> bool {
        match self.prefs.read(FIRST_TIME_KEY) {
            Some(v) => v == "1",
            None => true,
        }
    }

    /// Clear the first-launch flag
    pub fn mark_first_time_done(&mut self) {
        self.prefs.write(FIRST_TIME_KEY, "0".to_string());
        if let Err(e) = self.prefs.flush() {
            log::warn!("Failed to persist first-time flag: {}", e);
        }
    }
}
