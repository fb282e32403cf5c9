//! Monster catalog loader.

use std::path::Path;

use dpr_core::MonsterEntry;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const BUILTIN_MONSTERS: &str = include_str!("../../data/monsters.ron");

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub monsters: Vec<MonsterEntry>,
}

impl MonsterCatalog {
    /// The bestiary shipped with this crate.
    pub fn builtin() -> LoadResult<Self> {
        MonsterLoader::parse(BUILTIN_MONSTERS)
    }

    pub fn get(&self, id: &str) -> Option<&MonsterEntry> {
        self.monsters.iter().find(|monster| monster.id == id)
    }

    /// Lookup by id, with a descriptive error for the CLI.
    pub fn require(&self, id: &str) -> LoadResult<&MonsterEntry> {
        self.get(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown monster '{}'", id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonsterEntry> {
        self.monsters.iter()
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

/// Loader for monster catalogs from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<MonsterCatalog> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)?;
        tracing::info!(path = %path.display(), monsters = catalog.len(), "loaded monster catalog");
        Ok(catalog)
    }

    pub fn parse(content: &str) -> LoadResult<MonsterCatalog> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster catalog RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpr_core::DamageType;

    #[test]
    fn builtin_bestiary_parses() {
        let catalog = MonsterCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        let goblin = catalog.get("goblin").unwrap();
        assert_eq!(goblin.ac, 15);
        assert_eq!(goblin.abilities.dex, 14);
    }

    #[test]
    fn builtin_ids_are_unique() {
        let catalog = MonsterCatalog::builtin().unwrap();
        let mut ids: Vec<_> = catalog.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn physical_defenses_are_exposed() {
        let catalog = MonsterCatalog::builtin().unwrap();
        let skeleton = catalog.require("skeleton").unwrap();
        assert_eq!(skeleton.physical_vulnerability(), Some(DamageType::Bludgeoning));
        assert_eq!(skeleton.physical_resistance(), None);
        assert!(catalog.require("tarrasque-jr").is_err());
    }
}
