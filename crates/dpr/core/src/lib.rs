//! Expected damage-per-round evaluation over a user-wired node graph.
//!
//! `dpr-core` holds the rules: catalogs of weapons and features, the d20 hit
//! model, the per-sequence damage calculator and the once-per-round resolver.
//! It performs no I/O. Evaluation flows through [`engine::DprEngine`], and the
//! persistence and CLI crates depend on the types re-exported here.
pub mod catalog;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod graph;

pub use catalog::{
    AbilityScores, Catalog, CatalogError, CatalogOracle, FeatureType, FeatureTypePreset,
    FightingStyle, FightingStylePreset, MonsterEntry, TargetProfile, WeaponPreset, WeaponTags,
};
pub use combat::{
    AdvMode, DamageType, Dice, HitChances, RoundResolution, SequenceContext, SequenceOutcome,
    evaluate_sequence, hit_chances, resolve_round,
};
pub use config::{AttackerProfile, EngineSettings, ability_modifier, proficiency_bonus};
pub use engine::{DprEngine, Evaluation};
pub use error::{DprError, ErrorSeverity};
pub use features::{FeatureBundle, FeatureEffect, FeatureNode, LegacyFeatures, SmiteConfig};
pub use graph::{
    ActionType, AttackNode, BuffsNode, Edge, FeatsNode, Graph, GraphError, Grip, Node, NodeId,
    NodeKind, OutputNode, Position, SequenceBreakdown, Summary,
};
