//! Level content data model
//!
//! Immutable level definitions: item groups, item placements, rewards.
//! Loaded once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default coin reward for a level when the content omits one
pub const DEFAULT_COINS_REWARD: u32 = 100;

/// A single hidden item placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique within the owning group
    pub item_id: String,
    /// Authored world position of the item in the scene
    pub position: (f32, f32),
}

/// A named category of items sharing one goal-panel icon and counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    /// Unique within the level
    pub group_id: String,
    /// Resource path of the goal-panel icon
    pub icon: String,
    /// Items to find; must be non-empty with unique ids
    pub items: Vec<ItemDefinition>,
}

impl ItemGroup {
    /// Fixed number of items to find in this group
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Whether the group contains an item with the given id
    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i.item_id == item_id)
    }
}

/// Immutable definition of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Globally unique; used as the persistence key
    pub level_id: String,
    /// Resource path of the background scene image
    pub background: String,
    /// Groups in goal-panel order
    pub groups: Vec<ItemGroup>,
    /// Coins awarded on every completion
    #[serde(default = "default_coins_reward")]
    pub coins_reward: u32,
    /// Optional timer budget driving the star rating; None means untimed
    #[serde(default)]
    pub time_budget_secs: Option<f32>,
}

fn default_coins_reward() -> u32 {
    DEFAULT_COINS_REWARD
}

impl LevelDefinition {
    /// Total items across all groups
    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|g| g.total_items()).sum()
    }

    /// Find the group owning an item, along with the item itself
    pub fn find_item(&self, item_id: &str) -> Option<(&ItemGroup, &ItemDefinition)> {
        for group in &self.groups {
            if let Some(item) = group.items.iter().find(|i| i.item_id == item_id) {
                return Some((group, item));
            }
        }
        None
    }

    /// Look up a group by id
    pub fn group(&self, group_id: &str) -> Option<&ItemGroup> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }

    /// Iterator over every item id in the level
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter().map(|i| i.item_id.as_str()))
    }

    /// Validate the definition before it enters the catalog.
    ///
    /// A failing level is rejected as a whole; allowing it through would
    /// leave its completion semantics undefined.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.level_id.is_empty() {
            return Err(ContentError::MissingLevelId);
        }
        if self.groups.is_empty() {
            return Err(ContentError::NoGroups {
                level: self.level_id.clone(),
            });
        }
        if let Some(budget) = self.time_budget_secs {
            if budget <= 0.0 {
                return Err(ContentError::InvalidTimeBudget {
                    level: self.level_id.clone(),
                    budget,
                });
            }
        }

        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.group_id.as_str()) {
                return Err(ContentError::DuplicateGroup {
                    level: self.level_id.clone(),
                    group: group.group_id.clone(),
                });
            }
            if group.items.is_empty() {
                return Err(ContentError::EmptyGroup {
                    level: self.level_id.clone(),
                    group: group.group_id.clone(),
                });
            }
            if group.icon.is_empty() {
                return Err(ContentError::MissingIcon {
                    level: self.level_id.clone(),
                    group: group.group_id.clone(),
                });
            }
            let mut item_ids = HashSet::new();
            for item in &group.items {
                if !item_ids.insert(item.item_id.as_str()) {
                    return Err(ContentError::DuplicateItem {
                        level: self.level_id.clone(),
                        group: group.group_id.clone(),
                        item: item.item_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Content validation errors; fatal to loading the offending level
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("level has an empty id")]
    MissingLevelId,
    #[error("level '{level}' defines no item groups")]
    NoGroups { level: String },
    #[error("level '{level}' group '{group}' has no items")]
    EmptyGroup { level: String, group: String },
    #[error("level '{level}' group '{group}' has no icon")]
    MissingIcon { level: String, group: String },
    #[error("level '{level}' has duplicate group id '{group}'")]
    DuplicateGroup { level: String, group: String },
    #[error("level '{level}' group '{group}' has duplicate item id '{item}'")]
    DuplicateItem {
        level: String,
        group: String,
        item: String,
    },
    #[error("level '{level}' has non-positive time budget {budget}")]
    InvalidTimeBudget { level: String, budget: f32 },
    #[error("duplicate level id '{level}' in catalog")]
    DuplicateLevel { level: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_level() -> LevelDefinition {
        LevelDefinition {
            level_id: "garden".to_string(),
            background: "backgrounds/garden.png".to_string(),
            groups: vec![
                ItemGroup {
                    group_id: "fruits".to_string(),
                    icon: "icons/fruits.png".to_string(),
                    items: vec![
                        ItemDefinition {
                            item_id: "apple".to_string(),
                            position: (1.0, 2.0),
                        },
                        ItemDefinition {
                            item_id: "pear".to_string(),
                            position: (-3.0, 0.5),
                        },
                    ],
                },
                ItemGroup {
                    group_id: "tools".to_string(),
                    icon: "icons/tools.png".to_string(),
                    items: vec![ItemDefinition {
                        item_id: "rake".to_string(),
                        position: (4.0, -1.0),
                    }],
                },
            ],
            coins_reward: 100,
            time_budget_secs: Some(120.0),
        }
    }

    #[test]
    fn test_valid_level_passes() {
        assert_eq!(sample_level().validate(), Ok(()));
    }

    #[test]
    fn test_total_items() {
        assert_eq!(sample_level().total_items(), 3);
    }

    #[test]
    fn test_find_item_resolves_group() {
        let level = sample_level();
        let (group, item) = level.find_item("rake").unwrap();
        assert_eq!(group.group_id, "tools");
        assert_eq!(item.position, (4.0, -1.0));
        assert!(level.find_item("anvil").is_none());
    }

    #[test]
    fn test_empty_group_rejected() {
        let mut level = sample_level();
        level.groups[1].items.clear();
        assert!(matches!(
            level.validate(),
            Err(ContentError::EmptyGroup { .. })
        ));
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let mut level = sample_level();
        let dup = level.groups[0].items[0].clone();
        level.groups[0].items.push(dup);
        assert!(matches!(
            level.validate(),
            Err(ContentError::DuplicateItem { .. })
        ));
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let mut level = sample_level();
        level.groups[1].group_id = "fruits".to_string();
        assert!(matches!(
            level.validate(),
            Err(ContentError::DuplicateGroup { .. })
        ));
    }

    #[test]
    fn test_missing_icon_rejected() {
        let mut level = sample_level();
        level.groups[0].icon.clear();
        assert!(matches!(
            level.validate(),
            Err(ContentError::MissingIcon { .. })
        ));
    }

    #[test]
    fn test_bad_time_budget_rejected() {
        let mut level = sample_level();
        level.time_budget_secs = Some(0.0);
        assert!(matches!(
            level.validate(),
            Err(ContentError::InvalidTimeBudget { .. })
        ));
    }
}
