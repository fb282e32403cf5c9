//! Character-builder profile loader.

use std::path::Path;

use dpr_core::AttackerProfile;

use crate::formats::BuilderProfile;
use crate::loaders::{LoadResult, read_file};

/// Loader for `{ totalLevel, strMod, dexMod }` JSON exported by the builder.
pub struct BuilderLoader;

impl BuilderLoader {
    pub fn load(path: &Path) -> LoadResult<AttackerProfile> {
        let content = read_file(path)?;
        let profile: BuilderProfile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse builder profile JSON: {}", e))?;
        tracing::info!(
            level = profile.total_level,
            str_mod = profile.str_mod,
            dex_mod = profile.dex_mod,
            "loaded builder profile"
        );
        Ok(profile.into())
    }
}
