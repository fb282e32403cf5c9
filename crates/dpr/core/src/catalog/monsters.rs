//! Target data: monster entries and the resolved target profile.

use crate::combat::DamageType;
use crate::config::EngineSettings;

/// Six ability scores of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityScores {
    pub str: u8,
    pub dex: u8,
    pub con: u8,
    pub int: u8,
    pub wis: u8,
    pub cha: u8,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            str: 10,
            dex: 10,
            con: 10,
            int: 10,
            wis: 10,
            cha: 10,
        }
    }
}

/// A bestiary row used to pre-fill the target.
///
/// Resistances and vulnerabilities are kept as free-form strings since
/// bestiaries list many damage types; only the physical ones affect weapon DPR.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterEntry {
    pub id: String,
    pub name: String,
    pub cr: f32,
    pub ac: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: AbilityScores,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vulnerabilities: Vec<String>,
}

impl MonsterEntry {
    /// First listed resistance the weapon model understands.
    pub fn physical_resistance(&self) -> Option<DamageType> {
        first_physical(&self.resistances)
    }

    /// First listed vulnerability the weapon model understands.
    pub fn physical_vulnerability(&self) -> Option<DamageType> {
        first_physical(&self.vulnerabilities)
    }
}

fn first_physical(entries: &[String]) -> Option<DamageType> {
    entries.iter().find_map(|entry| entry.trim().parse().ok())
}

/// The defender as the engine sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetProfile {
    pub ac: i32,
    pub resist: Option<DamageType>,
    pub vuln: Option<DamageType>,
    pub abilities: Option<AbilityScores>,
}

impl TargetProfile {
    /// Target taken straight from the settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            ac: settings.target_ac,
            resist: settings.resist,
            vuln: settings.vuln,
            abilities: None,
        }
    }

    /// Resolve the target from an optional monster selection.
    ///
    /// A selected monster pre-fills AC, resistance, vulnerability and ability
    /// scores unless manual override is enabled, in which case the settings win.
    pub fn resolve(
        settings: &EngineSettings,
        monster: Option<&MonsterEntry>,
        manual_override: bool,
    ) -> Self {
        match monster {
            Some(monster) if !manual_override => Self {
                ac: monster.ac,
                resist: monster.physical_resistance(),
                vuln: monster.physical_vulnerability(),
                abilities: Some(monster.abilities),
            },
            _ => Self::from_settings(settings),
        }
    }

    /// Copy this target back into settings, which is what the evaluator reads.
    pub fn apply_to(&self, settings: &mut EngineSettings) {
        settings.target_ac = self.ac;
        settings.resist = self.resist;
        settings.vuln = self.vuln;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skeleton() -> MonsterEntry {
        MonsterEntry {
            id: "skeleton".into(),
            name: "Skeleton".into(),
            cr: 0.25,
            ac: 13,
            abilities: AbilityScores {
                str: 10,
                dex: 14,
                con: 15,
                int: 6,
                wis: 8,
                cha: 5,
            },
            resistances: vec![],
            vulnerabilities: vec!["bludgeoning".into()],
        }
    }

    #[test]
    fn monster_prefills_target() {
        let settings = EngineSettings::default();
        let target = TargetProfile::resolve(&settings, Some(&skeleton()), false);
        assert_eq!(target.ac, 13);
        assert_eq!(target.vuln, Some(DamageType::Bludgeoning));
        assert_eq!(target.resist, None);
        assert_eq!(target.abilities.map(|a| a.dex), Some(14));
    }

    #[test]
    fn manual_override_wins() {
        let settings = EngineSettings::default().with_target_ac(18);
        let target = TargetProfile::resolve(&settings, Some(&skeleton()), true);
        assert_eq!(target.ac, 18);
        assert_eq!(target.vuln, None);
    }

    #[test]
    fn non_physical_entries_are_ignored() {
        let mut monster = skeleton();
        monster.resistances = vec!["fire".into(), " Piercing ".into()];
        assert_eq!(monster.physical_resistance(), Some(DamageType::Piercing));
    }
}
