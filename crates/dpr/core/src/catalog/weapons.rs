//! Weapon presets.

use bitflags::bitflags;

use crate::combat::{DamageType, Dice};

bitflags! {
    /// Weapon properties that matter to damage evaluation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct WeaponTags: u16 {
        const FINESSE    = 1 << 0;
        const RANGED     = 1 << 1;
        const LIGHT      = 1 << 2;
        const HEAVY      = 1 << 3;
        const TWO_HANDED = 1 << 4;
        const VERSATILE  = 1 << 5;
        const REACH      = 1 << 6;
        const THROWN     = 1 << 7;
        const LOADING    = 1 << 8;
        /// Eligible for Great Weapon Master's -5/+10.
        const GWM        = 1 << 9;
        /// Eligible for Sharpshooter's -5/+10.
        const SS         = 1 << 10;
        /// Eligible for Polearm Master's butt-end attack.
        const POLEARM    = 1 << 11;
    }
}

/// A weapon row of the catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponPreset {
    pub id: String,
    pub name: String,
    pub dice: Dice,
    /// Die used when wielded in two hands, for versatile weapons.
    #[cfg_attr(feature = "serde", serde(default))]
    pub versatile: Option<Dice>,
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: WeaponTags,
}

impl WeaponPreset {
    pub fn new(id: &str, name: &str, dice: Dice, damage_type: DamageType, tags: WeaponTags) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            dice,
            versatile: None,
            damage_type,
            tags,
        }
    }

    pub fn with_versatile(mut self, dice: Dice) -> Self {
        self.versatile = Some(dice);
        self.tags |= WeaponTags::VERSATILE;
        self
    }

    pub fn has(&self, tag: WeaponTags) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_ranged(&self) -> bool {
        self.has(WeaponTags::RANGED)
    }

    pub fn is_melee(&self) -> bool {
        !self.is_ranged()
    }

    pub fn is_finesse(&self) -> bool {
        self.has(WeaponTags::FINESSE)
    }

    /// Ranged and finesse weapons attack with Dexterity.
    pub fn uses_dex(&self) -> bool {
        self.is_ranged() || self.is_finesse()
    }

    pub fn is_two_handed(&self) -> bool {
        self.has(WeaponTags::TWO_HANDED)
    }
}

/// Built-in weapon rows. The first row is the catalog default.
pub fn builtin_weapons() -> Vec<WeaponPreset> {
    use DamageType::*;
    use WeaponTags as T;

    vec![
        WeaponPreset::new("longsword", "Longsword", Dice::new(1, 8), Slashing, T::empty())
            .with_versatile(Dice::new(1, 10)),
        WeaponPreset::new(
            "greatsword",
            "Greatsword",
            Dice::new(2, 6),
            Slashing,
            T::HEAVY | T::TWO_HANDED | T::GWM,
        ),
        WeaponPreset::new(
            "greataxe",
            "Greataxe",
            Dice::new(1, 12),
            Slashing,
            T::HEAVY | T::TWO_HANDED | T::GWM,
        ),
        WeaponPreset::new(
            "maul",
            "Maul",
            Dice::new(2, 6),
            Bludgeoning,
            T::HEAVY | T::TWO_HANDED | T::GWM,
        ),
        WeaponPreset::new(
            "glaive",
            "Glaive",
            Dice::new(1, 10),
            Slashing,
            T::HEAVY | T::TWO_HANDED | T::REACH | T::GWM | T::POLEARM,
        ),
        WeaponPreset::new(
            "halberd",
            "Halberd",
            Dice::new(1, 10),
            Slashing,
            T::HEAVY | T::TWO_HANDED | T::REACH | T::GWM | T::POLEARM,
        ),
        WeaponPreset::new(
            "pike",
            "Pike",
            Dice::new(1, 10),
            Piercing,
            T::HEAVY | T::TWO_HANDED | T::REACH | T::GWM,
        ),
        WeaponPreset::new(
            "quarterstaff",
            "Quarterstaff",
            Dice::new(1, 6),
            Bludgeoning,
            T::POLEARM,
        )
        .with_versatile(Dice::new(1, 8)),
        WeaponPreset::new("spear", "Spear", Dice::new(1, 6), Piercing, T::THROWN | T::POLEARM)
            .with_versatile(Dice::new(1, 8)),
        WeaponPreset::new("battleaxe", "Battleaxe", Dice::new(1, 8), Slashing, T::empty())
            .with_versatile(Dice::new(1, 10)),
        WeaponPreset::new("warhammer", "Warhammer", Dice::new(1, 8), Bludgeoning, T::empty())
            .with_versatile(Dice::new(1, 10)),
        WeaponPreset::new("rapier", "Rapier", Dice::new(1, 8), Piercing, T::FINESSE),
        WeaponPreset::new(
            "shortsword",
            "Shortsword",
            Dice::new(1, 6),
            Piercing,
            T::FINESSE | T::LIGHT,
        ),
        WeaponPreset::new(
            "scimitar",
            "Scimitar",
            Dice::new(1, 6),
            Slashing,
            T::FINESSE | T::LIGHT,
        ),
        WeaponPreset::new(
            "dagger",
            "Dagger",
            Dice::new(1, 4),
            Piercing,
            T::FINESSE | T::LIGHT | T::THROWN,
        ),
        WeaponPreset::new(
            "handaxe",
            "Handaxe",
            Dice::new(1, 6),
            Slashing,
            T::LIGHT | T::THROWN,
        ),
        WeaponPreset::new(
            "shortbow",
            "Shortbow",
            Dice::new(1, 6),
            Piercing,
            T::RANGED | T::TWO_HANDED | T::SS,
        ),
        WeaponPreset::new(
            "longbow",
            "Longbow",
            Dice::new(1, 8),
            Piercing,
            T::RANGED | T::HEAVY | T::TWO_HANDED | T::SS,
        ),
        WeaponPreset::new(
            "hand-crossbow",
            "Hand Crossbow",
            Dice::new(1, 6),
            Piercing,
            T::RANGED | T::LIGHT | T::LOADING | T::SS,
        ),
        WeaponPreset::new(
            "light-crossbow",
            "Light Crossbow",
            Dice::new(1, 8),
            Piercing,
            T::RANGED | T::TWO_HANDED | T::LOADING | T::SS,
        ),
        WeaponPreset::new(
            "heavy-crossbow",
            "Heavy Crossbow",
            Dice::new(1, 10),
            Piercing,
            T::RANGED | T::HEAVY | T::TWO_HANDED | T::LOADING | T::SS,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rows_are_unique() {
        let weapons = builtin_weapons();
        let mut ids: Vec<_> = weapons.iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), weapons.len());
        assert_eq!(weapons[0].id, "longsword");
    }

    #[test]
    fn ability_selection_follows_tags() {
        let weapons = builtin_weapons();
        let find = |id: &str| weapons.iter().find(|w| w.id == id).cloned();

        let rapier = find("rapier").map(|w| w.uses_dex());
        let longbow = find("longbow").map(|w| w.uses_dex());
        let maul = find("maul").map(|w| w.uses_dex());
        assert_eq!(rapier, Some(true));
        assert_eq!(longbow, Some(true));
        assert_eq!(maul, Some(false));
    }

    #[test]
    fn versatile_builder_sets_tag() {
        let weapons = builtin_weapons();
        assert!(weapons[0].has(WeaponTags::VERSATILE));
        assert_eq!(weapons[0].versatile, Some(Dice::new(1, 10)));
    }
}
