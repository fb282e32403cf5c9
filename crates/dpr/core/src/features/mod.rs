//! Class-feature nodes and their aggregation into one modifier bundle.
//!
//! Every Features node attached to an Output is lowered into a list of
//! [`FeatureEffect`]s, and the effects are folded into a [`FeatureBundle`]:
//!
//! ```text
//! FeatureNode::Rage, ::Smite(..), ...  ─┐
//!                                       ├─> effects() ─> FeatureBundle::absorb
//! FeatureNode::LegacyAll(..)           ─┘
//! ```
//!
//! The combinators in [`FeatureBundle::absorb`] are the only place where two
//! features meet, so the legacy aggregate shape and the one-feature-per-node
//! shape cannot drift apart.

use crate::catalog::{FeatureType, FightingStyle};
use crate::combat::probability::{DEFAULT_CRIT_RANGE, MIN_CRIT_RANGE};

/// Default superiority die when maneuvers are configured without one.
pub const DEFAULT_MANEUVER_DIE: u8 = 8;

/// Divine Smite configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmiteConfig {
    /// Spell slot level spent each round; 0 disables smiting.
    pub slot_level: u8,
    /// Target is undead or a fiend (+1d8).
    pub undead_or_fiend: bool,
}

impl SmiteConfig {
    pub const MAX_BASE_DICE: u8 = 5;

    /// Number of d8s per smite: `min(5, slot + 1)`, plus one vs undead/fiends.
    pub fn dice(&self) -> u8 {
        if self.slot_level == 0 {
            return 0;
        }
        let base = (self.slot_level.saturating_add(1)).min(Self::MAX_BASE_DICE);
        base + u8::from(self.undead_or_fiend)
    }

    pub fn is_active(&self) -> bool {
        self.slot_level > 0
    }
}

/// One atomic effect contributed by a feature node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureEffect {
    Style(FightingStyle),
    SneakAttack,
    Rage,
    Hexblade,
    Smite(SmiteConfig),
    CritRange(u8),
    Maneuvers { per_round: u32, die: Option<u8> },
    BrutalCritical(u8),
}

/// Older node shape carrying every feature field at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LegacyFeatures {
    pub style: Option<FightingStyle>,
    pub sneak_attack: bool,
    pub rage: bool,
    pub hexblade: bool,
    pub smite: SmiteConfig,
    pub crit_range: Option<u8>,
    pub maneuvers_per_round: u32,
    pub maneuver_die: Option<u8>,
    pub brutal_crit_dice: u8,
}

/// A configured Features node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "featureType", rename_all = "kebab-case")
)]
pub enum FeatureNode {
    FightingStyle { style: FightingStyle },
    SneakAttack,
    Rage,
    Smite(SmiteConfig),
    Hexblade,
    CritRange { crit_range: u8 },
    Maneuvers { per_round: u32, die: Option<u8> },
    BrutalCritical { dice: u8 },
    LegacyAll(LegacyFeatures),
}

impl FeatureNode {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            FeatureNode::FightingStyle { .. } => FeatureType::FightingStyle,
            FeatureNode::SneakAttack => FeatureType::SneakAttack,
            FeatureNode::Rage => FeatureType::Rage,
            FeatureNode::Smite(_) => FeatureType::Smite,
            FeatureNode::Hexblade => FeatureType::Hexblade,
            FeatureNode::CritRange { .. } => FeatureType::CritRange,
            FeatureNode::Maneuvers { .. } => FeatureType::Maneuvers,
            FeatureNode::BrutalCritical { .. } => FeatureType::BrutalCritical,
            FeatureNode::LegacyAll(_) => FeatureType::LegacyAll,
        }
    }

    /// Lower this node into its atomic effects.
    pub fn effects(&self) -> Vec<FeatureEffect> {
        match self {
            FeatureNode::FightingStyle { style } => vec![FeatureEffect::Style(*style)],
            FeatureNode::SneakAttack => vec![FeatureEffect::SneakAttack],
            FeatureNode::Rage => vec![FeatureEffect::Rage],
            FeatureNode::Smite(smite) => vec![FeatureEffect::Smite(*smite)],
            FeatureNode::Hexblade => vec![FeatureEffect::Hexblade],
            FeatureNode::CritRange { crit_range } => vec![FeatureEffect::CritRange(*crit_range)],
            FeatureNode::Maneuvers { per_round, die } => vec![FeatureEffect::Maneuvers {
                per_round: *per_round,
                die: *die,
            }],
            FeatureNode::BrutalCritical { dice } => vec![FeatureEffect::BrutalCritical(*dice)],
            FeatureNode::LegacyAll(legacy) => legacy_effects(legacy),
        }
    }
}

fn legacy_effects(legacy: &LegacyFeatures) -> Vec<FeatureEffect> {
    let mut effects = Vec::new();
    if let Some(style) = legacy.style {
        effects.push(FeatureEffect::Style(style));
    }
    if legacy.sneak_attack {
        effects.push(FeatureEffect::SneakAttack);
    }
    if legacy.rage {
        effects.push(FeatureEffect::Rage);
    }
    if legacy.hexblade {
        effects.push(FeatureEffect::Hexblade);
    }
    if legacy.smite.is_active() || legacy.smite.undead_or_fiend {
        effects.push(FeatureEffect::Smite(legacy.smite));
    }
    if let Some(crit_range) = legacy.crit_range {
        effects.push(FeatureEffect::CritRange(crit_range));
    }
    if legacy.maneuvers_per_round > 0 || legacy.maneuver_die.is_some() {
        effects.push(FeatureEffect::Maneuvers {
            per_round: legacy.maneuvers_per_round,
            die: legacy.maneuver_die,
        });
    }
    if legacy.brutal_crit_dice > 0 {
        effects.push(FeatureEffect::BrutalCritical(legacy.brutal_crit_dice));
    }
    effects
}

/// Normalized modifiers of every Features node feeding one Output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureBundle {
    pub style: FightingStyle,
    pub sneak_attack: bool,
    pub rage: bool,
    pub hexblade: bool,
    pub smite: SmiteConfig,
    pub crit_range: u8,
    pub maneuvers_per_round: u32,
    pub maneuver_die: Option<u8>,
    pub brutal_crit_dice: u8,
}

impl FeatureBundle {
    pub const fn new() -> Self {
        Self {
            style: FightingStyle::None,
            sneak_attack: false,
            rage: false,
            hexblade: false,
            smite: SmiteConfig {
                slot_level: 0,
                undead_or_fiend: false,
            },
            crit_range: DEFAULT_CRIT_RANGE,
            maneuvers_per_round: 0,
            maneuver_die: None,
            brutal_crit_dice: 0,
        }
    }

    /// Merge every node in order.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a FeatureNode>) -> Self {
        let mut bundle = Self::new();
        for node in nodes {
            for effect in node.effects() {
                bundle.absorb(effect);
            }
        }
        bundle
    }

    /// Fold one effect into the bundle.
    ///
    /// Style: first non-empty wins. Flags: OR. Crit range: min (widest).
    /// Maneuvers: counts sum, die takes the largest face. Brutal dice: max.
    /// Smite: max slot, OR the undead/fiend flag.
    pub fn absorb(&mut self, effect: FeatureEffect) {
        match effect {
            FeatureEffect::Style(style) => {
                if self.style == FightingStyle::None {
                    self.style = style;
                }
            }
            FeatureEffect::SneakAttack => self.sneak_attack = true,
            FeatureEffect::Rage => self.rage = true,
            FeatureEffect::Hexblade => self.hexblade = true,
            FeatureEffect::Smite(smite) => {
                self.smite.slot_level = self.smite.slot_level.max(smite.slot_level);
                self.smite.undead_or_fiend |= smite.undead_or_fiend;
            }
            FeatureEffect::CritRange(range) => {
                let range = range.clamp(MIN_CRIT_RANGE, DEFAULT_CRIT_RANGE);
                self.crit_range = self.crit_range.min(range);
            }
            FeatureEffect::Maneuvers { per_round, die } => {
                self.maneuvers_per_round = self.maneuvers_per_round.saturating_add(per_round);
                self.maneuver_die = match (self.maneuver_die, die) {
                    (Some(current), Some(new)) => Some(current.max(new)),
                    (current, new) => current.or(new),
                };
            }
            FeatureEffect::BrutalCritical(dice) => {
                self.brutal_crit_dice = self.brutal_crit_dice.max(dice);
            }
        }
    }

    /// Superiority die face, defaulting to d8.
    pub fn maneuver_die_faces(&self) -> u8 {
        self.maneuver_die
            .filter(|faces| *faces > 0)
            .unwrap_or(DEFAULT_MANEUVER_DIE)
    }
}

impl Default for FeatureBundle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bundle_is_neutral() {
        let none: [FeatureNode; 0] = [];
        let bundle = FeatureBundle::from_nodes(&none);
        assert_eq!(bundle, FeatureBundle::new());
        assert_eq!(bundle.crit_range, 20);
        assert_eq!(bundle.maneuver_die_faces(), 8);
    }

    #[test]
    fn single_purpose_nodes_merge() {
        let nodes = [
            FeatureNode::CritRange { crit_range: 19 },
            FeatureNode::CritRange { crit_range: 18 },
            FeatureNode::Maneuvers {
                per_round: 1,
                die: Some(8),
            },
            FeatureNode::Maneuvers {
                per_round: 1,
                die: Some(10),
            },
            FeatureNode::BrutalCritical { dice: 1 },
            FeatureNode::BrutalCritical { dice: 2 },
            FeatureNode::Smite(SmiteConfig {
                slot_level: 1,
                undead_or_fiend: true,
            }),
            FeatureNode::Smite(SmiteConfig {
                slot_level: 3,
                undead_or_fiend: false,
            }),
        ];
        let bundle = FeatureBundle::from_nodes(&nodes);
        assert_eq!(bundle.crit_range, 18);
        assert_eq!(bundle.maneuvers_per_round, 2);
        assert_eq!(bundle.maneuver_die, Some(10));
        assert_eq!(bundle.brutal_crit_dice, 2);
        assert_eq!(bundle.smite.slot_level, 3);
        assert!(bundle.smite.undead_or_fiend);
    }

    #[test]
    fn first_style_wins() {
        let nodes = [
            FeatureNode::FightingStyle {
                style: FightingStyle::None,
            },
            FeatureNode::FightingStyle {
                style: FightingStyle::Dueling,
            },
            FeatureNode::FightingStyle {
                style: FightingStyle::Archery,
            },
        ];
        assert_eq!(FeatureBundle::from_nodes(&nodes).style, FightingStyle::Dueling);
    }

    #[test]
    fn legacy_and_single_nodes_agree() {
        let legacy = FeatureNode::LegacyAll(LegacyFeatures {
            style: Some(FightingStyle::GreatWeaponFighting),
            sneak_attack: true,
            rage: true,
            hexblade: false,
            smite: SmiteConfig {
                slot_level: 2,
                undead_or_fiend: false,
            },
            crit_range: Some(19),
            maneuvers_per_round: 1,
            maneuver_die: Some(8),
            brutal_crit_dice: 1,
        });
        let singles = [
            FeatureNode::FightingStyle {
                style: FightingStyle::GreatWeaponFighting,
            },
            FeatureNode::SneakAttack,
            FeatureNode::Rage,
            FeatureNode::Smite(SmiteConfig {
                slot_level: 2,
                undead_or_fiend: false,
            }),
            FeatureNode::CritRange { crit_range: 19 },
            FeatureNode::Maneuvers {
                per_round: 1,
                die: Some(8),
            },
            FeatureNode::BrutalCritical { dice: 1 },
        ];
        assert_eq!(
            FeatureBundle::from_nodes([&legacy]),
            FeatureBundle::from_nodes(&singles)
        );
    }

    #[test]
    fn merge_order_does_not_matter_for_commutative_fields() {
        let a = FeatureNode::CritRange { crit_range: 19 };
        let b = FeatureNode::LegacyAll(LegacyFeatures {
            crit_range: Some(20),
            maneuvers_per_round: 2,
            maneuver_die: Some(6),
            ..LegacyFeatures::default()
        });
        let c = FeatureNode::Maneuvers {
            per_round: 1,
            die: Some(10),
        };
        let forward = FeatureBundle::from_nodes([&a, &b, &c]);
        let backward = FeatureBundle::from_nodes([&c, &b, &a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn smite_dice_cap() {
        let smite = |slot_level, undead_or_fiend| SmiteConfig {
            slot_level,
            undead_or_fiend,
        };
        assert_eq!(smite(0, true).dice(), 0);
        assert_eq!(smite(1, false).dice(), 2);
        assert_eq!(smite(4, false).dice(), 5);
        assert_eq!(smite(5, false).dice(), 5);
        assert_eq!(smite(5, true).dice(), 6);
    }

    #[test]
    fn node_reports_its_type() {
        assert_eq!(FeatureNode::Rage.feature_type(), FeatureType::Rage);
        assert_eq!(
            FeatureNode::LegacyAll(LegacyFeatures::default()).feature_type(),
            FeatureType::LegacyAll
        );
    }
}
