//! Level catalog loading
//!
//! Loads level content from an external RON file, with fallback to hardcoded
//! sample levels. Catalog order is author-defined and drives the unlock chain.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::level::{ContentError, ItemDefinition, ItemGroup, LevelDefinition};

/// File name of the authored level content under the assets directory
const LEVELS_FILE: &str = "levels.ron";

/// The ordered, validated collection of all level definitions
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Build a catalog from raw definitions, dropping any level that fails
    /// validation and any level whose id repeats an earlier one.
    pub fn new(definitions: Vec<LevelDefinition>) -> Self {
        let mut levels = Vec::with_capacity(definitions.len());
        let mut seen = HashSet::new();
        for level in definitions {
            if let Err(e) = level.validate() {
                log::warn!("Skipping invalid level: {}", e);
                continue;
            }
            if !seen.insert(level.level_id.clone()) {
                let e = ContentError::DuplicateLevel {
                    level: level.level_id.clone(),
                };
                log::warn!("Skipping invalid level: {}", e);
                continue;
            }
            levels.push(level);
        }
        Self { levels }
    }

    /// Load the catalog from `<base>/levels.ron`, or fall back to the
    /// built-in sample levels if the file is missing or unreadable.
    pub fn load(base_path: &Path) -> Self {
        let path = base_path.join(LEVELS_FILE);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str::<Vec<LevelDefinition>>(&content) {
                    Ok(definitions) => {
                        let catalog = Self::new(definitions);
                        log::info!("Loaded {} levels from {:?}", catalog.len(), path);
                        return catalog;
                    }
                    Err(e) => log::warn!("Failed to parse {}: {}", LEVELS_FILE, e),
                },
                Err(e) => log::warn!("Failed to read {}: {}", LEVELS_FILE, e),
            }
        }
        log::info!("Using built-in sample levels");
        Self::new(default_levels())
    }

    /// Number of levels in the catalog
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Look up a level by id
    pub fn get(&self, level_id: &str) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.level_id == level_id)
    }

    /// The first level in the catalog order (always unlocked)
    pub fn first(&self) -> Option<&LevelDefinition> {
        self.levels.first()
    }

    /// Iterate levels in unlock order
    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    /// Level ids in unlock order
    pub fn ordered_ids(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.level_id.as_str()).collect()
    }
}

/// Export the built-in sample levels as a pretty RON file for easy editing
pub fn export_default_levels(base_path: &Path) -> Result<(), String> {
    if !base_path.exists() {
        fs::create_dir_all(base_path)
            .map_err(|e| format!("Failed to create {:?}: {}", base_path, e))?;
    }

    let levels = default_levels();
    let levels_ron = ron::ser::to_string_pretty(&levels, ron::ser::PrettyConfig::default())
        .map_err(|e| format!("Failed to serialize levels: {}", e))?;
    fs::write(base_path.join(LEVELS_FILE), levels_ron)
        .map_err(|e| format!("Failed to write {}: {}", LEVELS_FILE, e))?;

    Ok(())
}

/// Built-in sample content used when no levels.ron is present
pub fn default_levels() -> Vec<LevelDefinition> {
    vec![
        LevelDefinition {
            level_id: "garden".to_string(),
            background: "backgrounds/garden.png".to_string(),
            groups: vec![
                ItemGroup {
                    group_id: "fruits".to_string(),
                    icon: "icons/fruits.png".to_string(),
                    items: vec![
                        item("apple", -4.2, 1.3),
                        item("pear", 2.8, -0.6),
                        item("cherry", 6.1, 2.4),
                    ],
                },
                ItemGroup {
                    group_id: "tools".to_string(),
                    icon: "icons/tools.png".to_string(),
                    items: vec![item("rake", -1.5, -2.8), item("watering_can", 5.0, -3.1)],
                },
            ],
            coins_reward: 100,
            time_budget_secs: Some(120.0),
        },
        LevelDefinition {
            level_id: "kitchen".to_string(),
            background: "backgrounds/kitchen.png".to_string(),
            groups: vec![
                ItemGroup {
                    group_id: "utensils".to_string(),
                    icon: "icons/utensils.png".to_string(),
                    items: vec![
                        item("whisk", -6.0, 0.8),
                        item("ladle", 0.4, 3.2),
                        item("spatula", 3.7, -1.9),
                    ],
                },
                ItemGroup {
                    group_id: "spices".to_string(),
                    icon: "icons/spices.png".to_string(),
                    items: vec![item("pepper_mill", -2.3, -3.4), item("salt_shaker", 7.2, 1.1)],
                },
            ],
            coins_reward: 150,
            time_budget_secs: Some(150.0),
        },
        LevelDefinition {
            level_id: "attic".to_string(),
            background: "backgrounds/attic.png".to_string(),
            groups: vec![
                ItemGroup {
                    group_id: "keepsakes".to_string(),
                    icon: "icons/keepsakes.png".to_string(),
                    items: vec![
                        item("pocket_watch", -5.1, 2.0),
                        item("locket", 1.9, -2.2),
                        item("photo_album", 6.8, 0.3),
                        item("music_box", -0.7, 3.6),
                    ],
                },
                ItemGroup {
                    group_id: "toys".to_string(),
                    icon: "icons/toys.png".to_string(),
                    items: vec![item("rocking_horse", -3.9, -1.4), item("tin_soldier", 4.4, 3.0)],
                },
            ],
            coins_reward: 200,
            // Untimed; completion always earns full stars
            time_budget_secs: None,
        },
    ]
}

fn item(id: &str, x: f32, y: f32) -> ItemDefinition {
    ItemDefinition {
        item_id: id.to_string(),
        position: (x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels_are_valid() {
        for level in default_levels() {
            assert_eq!(level.validate(), Ok(()), "level {}", level.level_id);
        }
    }

    #[test]
    fn test_catalog_order_and_lookup() {
        let catalog = LevelCatalog::new(default_levels());
        assert_eq!(catalog.ordered_ids(), vec!["garden", "kitchen", "attic"]);
        assert_eq!(catalog.first().unwrap().level_id, "garden");
        assert_eq!(catalog.get("kitchen").unwrap().coins_reward, 150);
        assert!(catalog.get("cellar").is_none());
    }

    #[test]
    fn test_catalog_skips_invalid_levels() {
        let mut definitions = default_levels();
        definitions[1].groups[0].items.clear();
        let catalog = LevelCatalog::new(definitions);
        assert_eq!(catalog.ordered_ids(), vec!["garden", "attic"]);
    }

    #[test]
    fn test_catalog_skips_duplicate_level_ids() {
        let mut definitions = default_levels();
        let mut dup = definitions[0].clone();
        dup.coins_reward = 999;
        definitions.push(dup);
        let catalog = LevelCatalog::new(definitions);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("garden").unwrap().coins_reward, 100);
    }

    #[test]
    fn test_export_then_load_round_trip() {
        let base = std::env::temp_dir().join("hiddengrove_loader_test");
        export_default_levels(&base).unwrap();
        let catalog = LevelCatalog::load(&base);
        assert_eq!(catalog.ordered_ids(), vec!["garden", "kitchen", "attic"]);
        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let base = std::env::temp_dir().join("hiddengrove_no_such_dir");
        let catalog = LevelCatalog::load(&base);
        assert_eq!(catalog.len(), default_levels().len());
    }
}
