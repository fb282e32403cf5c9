//! Weapon catalog loader.

use std::path::Path;

use dpr_core::{Catalog, WeaponPreset};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Weapon catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponCatalog {
    pub weapons: Vec<WeaponPreset>,
}

/// Loader for weapon catalogs from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    /// Load weapon rows from a RON file. The first row becomes the default.
    pub fn load(path: &Path) -> LoadResult<Vec<WeaponPreset>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<WeaponPreset>> {
        let catalog: WeaponCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon catalog RON: {}", e))?;
        Ok(catalog.weapons)
    }

    /// Built-in catalog with its weapon table replaced by the file's rows.
    pub fn load_catalog(path: &Path) -> LoadResult<Catalog> {
        let weapons = Self::load(path)?;
        let count = weapons.len();
        let catalog = Catalog::builtin().with_weapons(weapons)?;
        tracing::info!(path = %path.display(), weapons = count, "loaded weapon catalog");
        Ok(catalog)
    }
}
