//! Content loaders for reading engine inputs from files.
//!
//! Graph documents and builder profiles are JSON, catalogs are RON and
//! settings are TOML. All loaders convert through the shapes in
//! [`crate::formats`].

pub mod builder;
pub mod graph;
pub mod monsters;
pub mod settings;
pub mod weapons;

pub use builder::BuilderLoader;
pub use graph::GraphLoader;
pub use monsters::{MonsterCatalog, MonsterLoader};
pub use settings::SettingsLoader;
pub use weapons::{WeaponCatalog, WeaponLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Helper function to write file contents, creating parent directories.
pub(crate) fn write_file(path: &Path, contents: &str) -> LoadResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", path.display(), e))
}
