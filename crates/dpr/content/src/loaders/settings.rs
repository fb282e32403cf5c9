//! Engine settings loader.

use std::path::Path;

use dpr_core::EngineSettings;

use crate::formats::WireSettings;
use crate::loaders::{LoadResult, read_file};

/// Loader for engine settings from TOML files.
///
/// The file uses the same keys as a graph document's `settings` block:
///
/// ```toml
/// level = 8
/// str = 18
/// dex = 12
/// targetAC = 17
/// advMode = "adv"
/// useVersatile = false
/// resist = "none"
/// vuln = "bludgeoning"
/// ```
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<EngineSettings> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineSettings> {
        let wire: WireSettings = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse settings TOML: {}", e))?;
        Ok(wire.to_settings())
    }
}
