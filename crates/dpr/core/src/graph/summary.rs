//! Evaluation result attached to Output nodes.

use crate::combat::AdvMode;

use super::{ActionType, NodeId};

/// Per-sequence figures shown next to the total.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SequenceBreakdown {
    /// Attack node the sequence came from; `None` for implied sequences.
    pub source: Option<NodeId>,
    pub weapon: String,
    pub action_type: ActionType,
    pub to_hit: f64,
    pub p_hit: f64,
    pub p_crit: f64,
    pub attacks: u32,
    pub dpr: f64,
}

/// Expected damage per round of one Output node.
///
/// `to_hit`, `p_hit` and `p_crit` are display values: the best to-hit across
/// sequences and the hit split of the first sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Summary {
    pub to_hit: f64,
    pub adv_mode: AdvMode,
    #[cfg_attr(feature = "serde", serde(rename = "targetAC"))]
    pub target_ac: i32,
    pub p_hit: f64,
    pub p_crit: f64,
    pub attacks: u32,
    pub dpr: f64,
    pub notes: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sequences: Vec<SequenceBreakdown>,
}

impl Summary {
    /// Hit chance as a percentage, for display.
    pub fn hit_percent(&self) -> f64 {
        self.p_hit * 100.0
    }

    /// Crit chance as a percentage, for display.
    pub fn crit_percent(&self) -> f64 {
        self.p_crit * 100.0
    }
}
