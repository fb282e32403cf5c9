//! Persisted graph document (version 1).
//!
//! ```json
//! {
//!   "version": 1,
//!   "nodes": [{ "id": "a", "type": "attack", "position": { "x": 0, "y": 0 },
//!               "data": { "weaponId": "longsword", "actionType": "action", "grip": "main" } }],
//!   "edges": [{ "id": "e-a-out", "source": "a", "target": "out" }],
//!   "settings": { "level": 5, "str": 16, "dex": 14, "targetAC": 15, ... }
//! }
//! ```
//!
//! Node `data` is decoded leniently: unknown identifiers fall back to catalog
//! defaults and malformed records fall back to empty ones. Only a document
//! whose `nodes` or `edges` is not an array is rejected.

use std::fmt::Display;
use std::str::FromStr;

use dpr_core::{
    AttackNode, BuffsNode, CatalogOracle, Edge, EngineSettings, FeatsNode, FeatureNode,
    FeatureType, Graph, LegacyFeatures, Node, NodeKind, OutputNode, Position,
    SmiteConfig,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::settings::WireSettings;

pub const DOCUMENT_VERSION: u32 = 1;

/// Node type written by older editors for a fighting-style node.
pub const LEGACY_FIGHTER_STYLE: &str = "fighterStyle";

fn document_version() -> u32 {
    DOCUMENT_VERSION
}

/// A graph document as stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default = "document_version")]
    pub version: u32,
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub settings: WireSettings,
}

/// A node with its kind-specific data left undecoded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Data record of an `attack` node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttackData {
    pub weapon_id: String,
    pub action_type: String,
    pub grip: String,
}

/// Data record of a `features` node, covering every feature type at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeaturesData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(alias = "style", skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    pub sneak_attack: bool,
    pub rage: bool,
    pub hexblade: bool,
    pub smite_slot: u8,
    pub smite_undead: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crit_range: Option<u8>,
    pub maneuvers_per_round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maneuver_die: Option<u8>,
    pub brutal_crit_dice: u8,
}

impl FeaturesData {
    /// Resolve into a typed feature, falling back on unknown identifiers.
    pub fn to_feature<C: CatalogOracle + ?Sized>(&self, catalog: &C) -> FeatureNode {
        let kind = catalog.feature_type_or_default(self.feature_type.as_deref().unwrap_or(""));
        let style = self
            .style_id
            .as_deref()
            .map(|id| catalog.fighting_style_or_default(id));
        let smite = SmiteConfig {
            slot_level: self.smite_slot,
            undead_or_fiend: self.smite_undead,
        };
        match kind {
            FeatureType::FightingStyle => FeatureNode::FightingStyle {
                style: style.unwrap_or_default(),
            },
            FeatureType::SneakAttack => FeatureNode::SneakAttack,
            FeatureType::Rage => FeatureNode::Rage,
            FeatureType::Smite => FeatureNode::Smite(smite),
            FeatureType::Hexblade => FeatureNode::Hexblade,
            FeatureType::CritRange => FeatureNode::CritRange {
                crit_range: self.crit_range.unwrap_or(20),
            },
            FeatureType::Maneuvers => FeatureNode::Maneuvers {
                per_round: self.maneuvers_per_round,
                die: self.maneuver_die,
            },
            FeatureType::BrutalCritical => FeatureNode::BrutalCritical {
                dice: self.brutal_crit_dice,
            },
            FeatureType::LegacyAll => FeatureNode::LegacyAll(LegacyFeatures {
                style,
                sneak_attack: self.sneak_attack,
                rage: self.rage,
                hexblade: self.hexblade,
                smite,
                crit_range: self.crit_range,
                maneuvers_per_round: self.maneuvers_per_round,
                maneuver_die: self.maneuver_die,
                brutal_crit_dice: self.brutal_crit_dice,
            }),
        }
    }
}

impl From<&FeatureNode> for FeaturesData {
    fn from(feature: &FeatureNode) -> Self {
        let mut data = FeaturesData {
            feature_type: Some(feature.feature_type().to_string()),
            ..FeaturesData::default()
        };
        match feature {
            FeatureNode::FightingStyle { style } => data.style_id = Some(style.to_string()),
            FeatureNode::SneakAttack => data.sneak_attack = true,
            FeatureNode::Rage => data.rage = true,
            FeatureNode::Hexblade => data.hexblade = true,
            FeatureNode::Smite(smite) => {
                data.smite_slot = smite.slot_level;
                data.smite_undead = smite.undead_or_fiend;
            }
            FeatureNode::CritRange { crit_range } => data.crit_range = Some(*crit_range),
            FeatureNode::Maneuvers { per_round, die } => {
                data.maneuvers_per_round = *per_round;
                data.maneuver_die = *die;
            }
            FeatureNode::BrutalCritical { dice } => data.brutal_crit_dice = *dice,
            FeatureNode::LegacyAll(legacy) => {
                data.style_id = legacy.style.map(|style| style.to_string());
                data.sneak_attack = legacy.sneak_attack;
                data.rage = legacy.rage;
                data.hexblade = legacy.hexblade;
                data.smite_slot = legacy.smite.slot_level;
                data.smite_undead = legacy.smite.undead_or_fiend;
                data.crit_range = legacy.crit_range;
                data.maneuvers_per_round = legacy.maneuvers_per_round;
                data.maneuver_die = legacy.maneuver_die;
                data.brutal_crit_dice = legacy.brutal_crit_dice;
            }
        }
        data
    }
}

/// A decoded document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentParts {
    pub graph: Graph,
    pub settings: EngineSettings,
    /// Legacy nodes rewritten during decoding.
    pub migrated: usize,
    /// Nodes dropped for an unknown type or a duplicate id.
    pub skipped: usize,
}

impl GraphDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Encode a graph and its settings. Output summaries are kept.
    pub fn from_graph(graph: &Graph, settings: &EngineSettings) -> Result<Self, serde_json::Error> {
        let nodes = graph
            .nodes
            .iter()
            .map(encode_node)
            .collect::<Result<Vec<_>, _>>()?;
        let edges = graph
            .edges
            .iter()
            .map(|edge| RawEdge {
                id: edge.id.clone(),
                source: edge.source.to_string(),
                target: edge.target.to_string(),
            })
            .collect();
        Ok(Self {
            version: DOCUMENT_VERSION,
            nodes,
            edges,
            settings: WireSettings::from(settings),
        })
    }

    /// Decode into a graph, migrating legacy nodes along the way.
    pub fn into_parts<C: CatalogOracle + ?Sized>(self, catalog: &C) -> DocumentParts {
        if self.version != DOCUMENT_VERSION {
            tracing::warn!(version = self.version, "unexpected document version; decoding as v1");
        }

        let mut graph = Graph::new();
        let mut migrated = 0;
        let mut skipped = 0;
        for raw in self.nodes {
            if raw.kind == LEGACY_FIGHTER_STYLE {
                migrated += 1;
            }
            let Some(node) = decode_node(&raw, catalog) else {
                skipped += 1;
                continue;
            };
            if graph.add_node(node).is_err() {
                tracing::warn!(node = %raw.id, "duplicate node id; keeping the first");
                skipped += 1;
            }
        }

        graph.edges = self
            .edges
            .into_iter()
            .map(|raw| {
                let mut edge = Edge::new(raw.source, raw.target);
                if !raw.id.is_empty() {
                    edge.id = raw.id;
                }
                edge
            })
            .collect();

        if migrated > 0 {
            tracing::info!(migrated, "migrated legacy fighting-style nodes");
        }

        DocumentParts {
            graph,
            settings: self.settings.to_settings(),
            migrated,
            skipped,
        }
    }
}

fn decode_node<C: CatalogOracle + ?Sized>(raw: &RawNode, catalog: &C) -> Option<Node> {
    let kind = match raw.kind.as_str() {
        "attack" => {
            let data: AttackData = decode_data(raw);
            NodeKind::Attack(AttackNode::new(
                data.weapon_id,
                parse_or_default(&data.action_type, "actionType", &raw.id),
                parse_or_default(&data.grip, "grip", &raw.id),
            ))
        }
        "feats" => NodeKind::Feats(decode_data::<FeatsNode>(raw)),
        "features" | LEGACY_FIGHTER_STYLE => {
            let mut data: FeaturesData = decode_data(raw);
            if raw.kind == LEGACY_FIGHTER_STYLE {
                data.feature_type = Some(FeatureType::FightingStyle.to_string());
            }
            NodeKind::Features(data.to_feature(catalog))
        }
        "buffs" => NodeKind::Buffs(decode_data::<BuffsNode>(raw)),
        "output" => NodeKind::Output(decode_data::<OutputNode>(raw)),
        other => {
            tracing::warn!(node = %raw.id, kind = other, "unknown node type; dropping node");
            return None;
        }
    };
    Some(Node::new(raw.id.as_str(), kind).at(raw.position))
}

fn decode_data<T: DeserializeOwned + Default>(raw: &RawNode) -> T {
    if raw.data.is_null() {
        return T::default();
    }
    serde_json::from_value(raw.data.clone()).unwrap_or_else(|err| {
        tracing::warn!(node = %raw.id, kind = %raw.kind, error = %err, "malformed node data; using defaults");
        T::default()
    })
}

fn parse_or_default<T>(value: &str, field: &'static str, node: &str) -> T
where
    T: FromStr + Default + Display,
{
    if value.is_empty() {
        return T::default();
    }
    value.parse().unwrap_or_else(|_| {
        let fallback = T::default();
        tracing::warn!(node, field, value, fallback = %fallback, "unknown value; using default");
        fallback
    })
}

fn encode_node(node: &Node) -> Result<RawNode, serde_json::Error> {
    let data = match &node.kind {
        NodeKind::Attack(attack) => serde_json::to_value(AttackData {
            weapon_id: attack.weapon_id.clone(),
            action_type: attack.action_type.to_string(),
            grip: attack.grip.to_string(),
        })?,
        NodeKind::Feats(feats) => serde_json::to_value(feats)?,
        NodeKind::Features(feature) => serde_json::to_value(FeaturesData::from(feature))?,
        NodeKind::Buffs(buffs) => serde_json::to_value(buffs)?,
        NodeKind::Output(output) => serde_json::to_value(output)?,
    };
    Ok(RawNode {
        id: node.id.to_string(),
        kind: node.kind.name().to_string(),
        position: node.position,
        data,
    })
}
