//! Damage types and dice expectation helpers.

// ============================================================================
// Damage Type
// ============================================================================

/// Weapon damage type, used for resistance and vulnerability.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DamageType {
    Slashing,
    Piercing,
    Bludgeoning,
}

// ============================================================================
// Dice
// ============================================================================

/// A homogeneous dice pool such as `2d6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dice {
    pub count: u8,
    pub faces: u8,
}

impl Dice {
    pub const fn new(count: u8, faces: u8) -> Self {
        Self { count, faces }
    }

    /// Expected total of the pool.
    pub fn average(&self) -> f64 {
        f64::from(self.count) * die_average(self.faces)
    }

    /// Expected total when Great Weapon Fighting re-rolls 1s and 2s once.
    pub fn average_with_rerolls(&self) -> f64 {
        f64::from(self.count) * (die_average(self.faces) + great_weapon_fighting_boost(self.faces))
    }
}

impl core::fmt::Display for Dice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)
    }
}

/// Average of one die: `(faces + 1) / 2`. A zero-sided die averages zero.
pub fn die_average(faces: u8) -> f64 {
    if faces == 0 {
        0.0
    } else {
        (f64::from(faces) + 1.0) / 2.0
    }
}

/// Expected gain per die from re-rolling a 1 or 2 once.
///
/// ```text
/// E[reroll dN] - E[dN] = (N - 2) / N
/// ```
///
/// d4: +0.5, d6: +0.667, d8: +0.75, d10: +0.8, d12: +0.833.
pub fn great_weapon_fighting_boost(faces: u8) -> f64 {
    if faces <= 2 {
        0.0
    } else {
        (f64::from(faces) - 2.0) / f64::from(faces)
    }
}

/// Expected total of `count` d6.
pub fn d6_pool(count: u32) -> f64 {
    f64::from(count) * die_average(6)
}

/// Expected total of `count` d8.
pub fn d8_pool(count: u32) -> f64 {
    f64::from(count) * die_average(8)
}

/// Rage damage bonus by barbarian level: +2 (1-8), +3 (9-15), +4 (16+).
pub const fn rage_bonus(level: u8) -> i32 {
    match level {
        0..=8 => 2,
        9..=15 => 3,
        _ => 4,
    }
}

/// Replace NaN and infinities with zero before they reach a summary.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_averages() {
        assert_eq!(Dice::new(2, 6).average(), 7.0);
        assert_eq!(Dice::new(1, 12).average(), 6.5);
        assert_eq!(Dice::new(1, 8).to_string(), "1d8");
        assert_eq!(die_average(0), 0.0);
    }

    #[test]
    fn great_weapon_fighting_table() {
        assert_eq!(great_weapon_fighting_boost(4), 0.5);
        assert_eq!(great_weapon_fighting_boost(8), 0.75);
        assert_eq!(great_weapon_fighting_boost(10), 0.8);
        assert!((great_weapon_fighting_boost(6) - 2.0 / 3.0).abs() < 1e-12);
        assert!((great_weapon_fighting_boost(12) - 10.0 / 12.0).abs() < 1e-12);
        // 2d6 with rerolls: 2 * (3.5 + 0.667)
        assert!((Dice::new(2, 6).average_with_rerolls() - 25.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rage_scales_with_level() {
        assert_eq!(rage_bonus(1), 2);
        assert_eq!(rage_bonus(8), 2);
        assert_eq!(rage_bonus(9), 3);
        assert_eq!(rage_bonus(15), 3);
        assert_eq!(rage_bonus(16), 4);
    }

    #[test]
    fn damage_type_strings() {
        assert_eq!("Slashing".parse::<DamageType>().ok(), Some(DamageType::Slashing));
        assert!("fire".parse::<DamageType>().is_err());
        assert_eq!(DamageType::Bludgeoning.as_ref(), "bludgeoning");
    }
}
