//! Unlock chain
//!
//! Levels unlock strictly in catalog order: a level is playable once its
//! predecessor is completed. The relation is derived from the progress table
//! on demand and never stored, so it can never go stale.

use std::collections::HashMap;

use super::store::LevelProgress;

/// Whether the given level is unlocked.
///
/// The first level is always unlocked; any other level requires its
/// predecessor in `ordered_ids` to be completed. Unknown ids read as locked.
pub fn is_unlocked(
    level_id: &str,
    ordered_ids: &[&str],
    table: &HashMap<String, LevelProgress>,
) -> bool {
    let index = match ordered_ids.iter().position(|id| *id == level_id) {
        Some(i) => i,
        None => return false,
    };
    if index == 0 {
        return true;
    }
    table
        .get(ordered_ids[index - 1])
        .map(|p| p.is_completed)
        .unwrap_or(false)
}

/// Index of the first locked level, or None if the whole chain is open
pub fn first_locked(
    ordered_ids: &[&str],
    table: &HashMap<String, LevelProgress>,
) -> Option<usize> {
    ordered_ids
        .iter()
        .position(|id| !is_unlocked(id, ordered_ids, table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_completed(ids: &[&str]) -> HashMap<String, LevelProgress> {
        let mut table = HashMap::new();
        for id in ids {
            let mut progress = LevelProgress::new(id);
            progress.is_completed = true;
            table.insert(id.to_string(), progress);
        }
        table
    }

    #[test]
    fn test_first_level_always_unlocked() {
        let ordered = ["a", "b", "c"];
        assert!(is_unlocked("a", &ordered, &HashMap::new()));
    }

    #[test]
    fn test_completed_prefix_unlocks_next() {
        let ordered = ["a", "b", "c", "d"];
        let table = table_with_completed(&["a", "b"]);
        assert!(is_unlocked("a", &ordered, &table));
        assert!(is_unlocked("b", &ordered, &table));
        assert!(is_unlocked("c", &ordered, &table));
        assert!(!is_unlocked("d", &ordered, &table));
    }

    #[test]
    fn test_unknown_level_is_locked() {
        let ordered = ["a", "b"];
        assert!(!is_unlocked("zzz", &ordered, &HashMap::new()));
    }

    #[test]
    fn test_incomplete_entry_does_not_unlock() {
        let ordered = ["a", "b"];
        let mut table = HashMap::new();
        table.insert("a".to_string(), LevelProgress::new("a"));
        assert!(!is_unlocked("b", &ordered, &table));
    }

    #[test]
    fn test_first_locked_scan() {
        let ordered = ["a", "b", "c"];
        assert_eq!(first_locked(&ordered, &HashMap::new()), Some(1));

        let table = table_with_completed(&["a"]);
        assert_eq!(first_locked(&ordered, &table), Some(2));

        let table = table_with_completed(&["a", "b", "c"]);
        assert_eq!(first_locked(&ordered, &table), None);
    }
}
