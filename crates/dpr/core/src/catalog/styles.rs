//! Fighting-style and feature-type presets.

/// Fighting styles the damage model knows how to apply.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FightingStyle {
    #[default]
    None,
    /// +2 to hit with ranged weapons.
    Archery,
    /// +1 AC; no damage effect.
    Defense,
    /// +2 damage with a one-handed melee weapon and nothing in the other hand.
    Dueling,
    /// Re-roll 1s and 2s on damage dice of two-handed melee attacks.
    GreatWeaponFighting,
    /// Add the ability modifier to off-hand damage.
    TwoWeaponFighting,
}

/// Class-feature node kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FeatureType {
    FightingStyle,
    SneakAttack,
    Rage,
    Smite,
    Hexblade,
    CritRange,
    Maneuvers,
    BrutalCritical,
    /// Older aggregate node carrying several features at once.
    LegacyAll,
}

/// Display row for a fighting style.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FightingStylePreset {
    pub style: FightingStyle,
    pub name: &'static str,
}

/// Display row for a feature type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeatureTypePreset {
    pub kind: FeatureType,
    pub name: &'static str,
    pub description: &'static str,
}

/// Built-in fighting styles. The first row is the catalog default.
pub fn builtin_fighting_styles() -> Vec<FightingStylePreset> {
    use FightingStyle::*;
    [
        (None, "None"),
        (Archery, "Archery"),
        (Defense, "Defense"),
        (Dueling, "Dueling"),
        (GreatWeaponFighting, "Great Weapon Fighting"),
        (TwoWeaponFighting, "Two-Weapon Fighting"),
    ]
    .into_iter()
    .map(|(style, name)| FightingStylePreset { style, name })
    .collect()
}

/// Built-in feature types. The first row is the catalog default.
pub fn builtin_feature_types() -> Vec<FeatureTypePreset> {
    use FeatureType::*;
    [
        (FightingStyle, "Fighting Style", "Archery, Dueling, Great Weapon Fighting, Two-Weapon Fighting"),
        (SneakAttack, "Sneak Attack", "Once per round, ceil(level / 2) d6 on a finesse or ranged hit"),
        (Rage, "Rage", "+2/+3/+4 melee damage by level"),
        (Smite, "Divine Smite", "One slot per round on the main action: (slot + 1) d8, +1d8 vs undead or fiends"),
        (Hexblade, "Hexblade's Curse", "+proficiency bonus damage per hit"),
        (CritRange, "Improved Critical", "Crit on 19 or 18"),
        (Maneuvers, "Battle Master Maneuvers", "Superiority dice added once per round"),
        (BrutalCritical, "Brutal Critical", "Extra weapon dice on melee criticals"),
        (LegacyAll, "Legacy (all fields)", "Older node carrying every feature field"),
    ]
    .into_iter()
    .map(|(kind, name, description)| FeatureTypePreset {
        kind,
        name,
        description,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_ids_are_kebab_case() {
        assert_eq!(FightingStyle::GreatWeaponFighting.to_string(), "great-weapon-fighting");
        assert_eq!(
            "two-weapon-fighting".parse::<FightingStyle>().ok(),
            Some(FightingStyle::TwoWeaponFighting)
        );
        assert_eq!(builtin_fighting_styles()[0].style, FightingStyle::None);
    }

    #[test]
    fn feature_type_ids_match_persisted_strings() {
        for (id, kind) in [
            ("fighting-style", FeatureType::FightingStyle),
            ("sneak-attack", FeatureType::SneakAttack),
            ("crit-range", FeatureType::CritRange),
            ("brutal-critical", FeatureType::BrutalCritical),
            ("legacy-all", FeatureType::LegacyAll),
        ] {
            assert_eq!(id.parse::<FeatureType>().ok(), Some(kind));
            assert_eq!(kind.as_ref(), id);
        }
        assert_eq!(builtin_feature_types()[0].kind, FeatureType::FightingStyle);
    }
}
