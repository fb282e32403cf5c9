//! Node kinds of the evaluation graph.

use crate::features::FeatureNode;

use super::Summary;

/// Stable node identifier, as assigned by the editor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Editor canvas position. Carried for persistence only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Action-economy slot an attack sequence occupies.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActionType {
    #[default]
    Action,
    Bonus,
    Free,
    Reaction,
}

/// Which hand(s) hold the weapon.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Grip {
    #[default]
    Main,
    Off,
    Both,
}

/// One attack sequence: repeated use of one weapon in one action slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackNode {
    pub weapon_id: String,
    pub action_type: ActionType,
    pub grip: Grip,
}

impl AttackNode {
    pub fn new(weapon_id: impl Into<String>, action_type: ActionType, grip: Grip) -> Self {
        Self {
            weapon_id: weapon_id.into(),
            action_type,
            grip,
        }
    }

    /// Attacks per round: the Extra Attack ladder for `action`, one otherwise.
    pub fn attacks_per_round(&self, level: u8) -> u32 {
        match self.action_type {
            ActionType::Action => match level {
                0..=4 => 1,
                5..=10 => 2,
                11..=19 => 3,
                _ => 4,
            },
            ActionType::Bonus | ActionType::Free | ActionType::Reaction => 1,
        }
    }
}

/// Feat toggles. Only the first Feats node feeding an Output is consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FeatsNode {
    /// Great Weapon Master.
    pub gwm: bool,
    /// Sharpshooter.
    pub ss: bool,
    /// Polearm Master.
    pub pam: bool,
    /// Crossbow Expert.
    pub cbe: bool,
}

/// Flat to-hit and on-hit buffs. Only the first Buffs node is consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuffsNode {
    /// Bless: +1d4 to hit.
    pub bless: bool,
    /// Hex / Hunter's Mark: +1d6 on each hit.
    pub d6onhit: bool,
}

/// Sink node. Holds the last computed summary.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputNode {
    pub summary: Option<Summary>,
}

/// Closed set of node kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "data", rename_all = "lowercase"))]
pub enum NodeKind {
    Attack(AttackNode),
    Feats(FeatsNode),
    Features(FeatureNode),
    Buffs(BuffsNode),
    Output(OutputNode),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Attack(_) => "attack",
            NodeKind::Feats(_) => "feats",
            NodeKind::Features(_) => "features",
            NodeKind::Buffs(_) => "buffs",
            NodeKind::Output(_) => "output",
        }
    }
}

/// A node of the evaluation graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Position,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position: Position::ORIGIN,
            kind,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn attack(id: &str, attack: AttackNode) -> Self {
        Self::new(id, NodeKind::Attack(attack))
    }

    pub fn feats(id: &str, feats: FeatsNode) -> Self {
        Self::new(id, NodeKind::Feats(feats))
    }

    pub fn features(id: &str, feature: FeatureNode) -> Self {
        Self::new(id, NodeKind::Features(feature))
    }

    pub fn buffs(id: &str, buffs: BuffsNode) -> Self {
        Self::new(id, NodeKind::Buffs(buffs))
    }

    pub fn output(id: &str) -> Self {
        Self::new(id, NodeKind::Output(OutputNode::default()))
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind, NodeKind::Output(_))
    }

    /// Summary attached to an Output node; `None` for other kinds.
    pub fn summary(&self) -> Option<&Summary> {
        match &self.kind {
            NodeKind::Output(output) => output.summary.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_attack_ladder() {
        let action = AttackNode::new("longsword", ActionType::Action, Grip::Main);
        assert_eq!(action.attacks_per_round(1), 1);
        assert_eq!(action.attacks_per_round(4), 1);
        assert_eq!(action.attacks_per_round(5), 2);
        assert_eq!(action.attacks_per_round(10), 2);
        assert_eq!(action.attacks_per_round(11), 3);
        assert_eq!(action.attacks_per_round(19), 3);
        assert_eq!(action.attacks_per_round(20), 4);

        let bonus = AttackNode::new("shortsword", ActionType::Bonus, Grip::Off);
        assert_eq!(bonus.attacks_per_round(20), 1);
    }

    #[test]
    fn action_and_grip_strings() {
        assert_eq!("reaction".parse::<ActionType>().ok(), Some(ActionType::Reaction));
        assert_eq!("Both".parse::<Grip>().ok(), Some(Grip::Both));
        assert_eq!(Grip::Off.as_ref(), "off");
    }
}
