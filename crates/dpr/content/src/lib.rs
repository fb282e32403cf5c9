//! Persistence boundary for the DPR engine.
//!
//! This crate reads and writes everything `dpr-core` consumes:
//! - Graph documents (JSON), including migration of legacy nodes
//! - Engine settings (TOML)
//! - Weapon catalogs (RON)
//! - Monster catalogs (RON), with a built-in bestiary
//! - Character-builder profiles (JSON)
//!
//! Decoding is lenient: unknown identifiers fall back to catalog defaults, and
//! [`loaders::GraphLoader::load_or_seed`] turns an unusable document into a
//! freshly seeded graph.

pub mod formats;
pub mod seed;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use formats::{
    BuilderProfile, DocumentParts, FeaturesData, GraphDocument, RawEdge, RawNode, WireSettings,
};
pub use seed::seed_graph;

#[cfg(feature = "loaders")]
pub use loaders::{
    BuilderLoader, GraphLoader, LoadResult, MonsterCatalog, MonsterLoader, SettingsLoader,
    WeaponCatalog, WeaponLoader,
};
