//! On-disk and over-the-wire shapes.
//!
//! These mirror what the editor writes: camelCase keys, enumerations as plain
//! strings, node data as loose records. Conversion into `dpr-core` types is
//! lenient and never fails on unknown identifiers.
mod document;
mod settings;

pub use document::{
    AttackData, DOCUMENT_VERSION, DocumentParts, FeaturesData, GraphDocument,
    LEGACY_FIGHTER_STYLE, RawEdge, RawNode,
};
pub use settings::{BuilderProfile, NO_DAMAGE_TYPE, WireSettings};
