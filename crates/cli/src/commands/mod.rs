//! Command implementations for `dpr`
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod catalog;
mod eval;
mod migrate;

pub use catalog::{Monsters, Weapons};
pub use eval::Eval;
pub use migrate::Migrate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dpr_content::{MonsterCatalog, MonsterLoader, WeaponLoader};
use dpr_core::Catalog;

/// How command results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable view
    #[default]
    Summary,
    /// JSON on stdout
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as clap::ValueEnum>::from_str(s, true)
    }
}

/// Pick the explicit flag, then the environment, then the built-in default.
fn pick_path<'a>(flag: Option<&'a Path>, env: Option<&'a PathBuf>) -> Option<&'a Path> {
    flag.or(env.map(PathBuf::as_path))
}

/// Weapon catalog from a RON file, or the built-in table.
fn load_weapons(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => WeaponLoader::load_catalog(path)
            .with_context(|| format!("Failed to load weapon catalog: {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

/// Monster catalog from a RON file, or the built-in bestiary.
fn load_monsters(path: Option<&Path>) -> Result<MonsterCatalog> {
    match path {
        Some(path) => MonsterLoader::load(path)
            .with_context(|| format!("Failed to load monster catalog: {}", path.display())),
        None => MonsterCatalog::builtin(),
    }
}
