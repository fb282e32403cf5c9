//! Global evaluation settings and the attacker profile derived from them.

use crate::combat::{AdvMode, DamageType};

/// Global settings shared by every Output node of a graph.
///
/// Mirrors the `settings` block of a persisted graph document. Any change to
/// these values triggers a fresh evaluation pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineSettings {
    /// Attacker character level (clamped to 1..=20 on use).
    pub level: u8,
    /// Strength score.
    pub strength: u8,
    /// Dexterity score.
    pub dexterity: u8,
    /// Target armor class.
    pub target_ac: i32,
    /// Roll mode applied to every attack.
    pub adv_mode: AdvMode,
    /// Use the versatile die for main-hand attacks with a free off hand.
    pub use_versatile: bool,
    /// Damage type the target resists, if any.
    pub resist: Option<DamageType>,
    /// Damage type the target is vulnerable to, if any.
    pub vuln: Option<DamageType>,
}

impl EngineSettings {
    pub const DEFAULT_LEVEL: u8 = 5;
    pub const DEFAULT_STRENGTH: u8 = 16;
    pub const DEFAULT_DEXTERITY: u8 = 14;
    pub const DEFAULT_TARGET_AC: i32 = 15;

    pub fn new() -> Self {
        Self {
            level: Self::DEFAULT_LEVEL,
            strength: Self::DEFAULT_STRENGTH,
            dexterity: Self::DEFAULT_DEXTERITY,
            target_ac: Self::DEFAULT_TARGET_AC,
            adv_mode: AdvMode::Normal,
            use_versatile: false,
            resist: None,
            vuln: None,
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_abilities(mut self, strength: u8, dexterity: u8) -> Self {
        self.strength = strength;
        self.dexterity = dexterity;
        self
    }

    pub fn with_target_ac(mut self, target_ac: i32) -> Self {
        self.target_ac = target_ac;
        self
    }

    pub fn with_adv_mode(mut self, adv_mode: AdvMode) -> Self {
        self.adv_mode = adv_mode;
        self
    }

    pub fn with_resist(mut self, resist: Option<DamageType>) -> Self {
        self.resist = resist;
        self
    }

    pub fn with_vuln(mut self, vuln: Option<DamageType>) -> Self {
        self.vuln = vuln;
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Ability modifier for a score: `floor((score - 10) / 2)`.
pub const fn ability_modifier(score: u8) -> i32 {
    (score as i32 - 10).div_euclid(2)
}

/// Proficiency bonus by character level: +2 at 1-4, rising by one every four levels.
pub const fn proficiency_bonus(level: u8) -> i32 {
    let level = clamp_level(level);
    2 + (level as i32 - 1) / 4
}

pub(crate) const fn clamp_level(level: u8) -> u8 {
    if level < AttackerProfile::MIN_LEVEL {
        AttackerProfile::MIN_LEVEL
    } else if level > AttackerProfile::MAX_LEVEL {
        AttackerProfile::MAX_LEVEL
    } else {
        level
    }
}

/// The attacker's numbers as the engine consumes them.
///
/// Either derived from [`EngineSettings`] or supplied by the character builder,
/// which takes precedence when present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackerProfile {
    pub level: u8,
    pub str_mod: i32,
    pub dex_mod: i32,
}

impl AttackerProfile {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 20;

    pub const fn new(level: u8, str_mod: i32, dex_mod: i32) -> Self {
        Self {
            level: clamp_level(level),
            str_mod,
            dex_mod,
        }
    }

    /// Derive the profile from locally held settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(
            settings.level,
            ability_modifier(settings.strength),
            ability_modifier(settings.dexterity),
        )
    }

    /// Pick the builder-supplied profile when present, else derive from settings.
    pub fn resolve(settings: &EngineSettings, builder: Option<AttackerProfile>) -> Self {
        match builder {
            Some(profile) => Self::new(profile.level, profile.str_mod, profile.dex_mod),
            None => Self::from_settings(settings),
        }
    }

    pub const fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }
}

impl Default for AttackerProfile {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}
