//! Hit and critical probabilities for a d20 attack roll.

/// Roll mode for the attack d20.
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
pub enum AdvMode {
    /// Single roll.
    #[default]
    Normal,
    /// Roll twice, keep the better result.
    Adv,
    /// Roll twice, keep the worse result.
    Dis,
}

impl AdvMode {
    /// Transform a single-roll success probability for this roll mode.
    ///
    /// ```text
    /// normal(p) = p
    /// adv(p)    = 1 - (1 - p)^2
    /// dis(p)    = p^2
    /// ```
    pub fn apply(self, p: f64) -> f64 {
        let p = clamp_probability(p);
        match self {
            AdvMode::Normal => p,
            AdvMode::Adv => 1.0 - (1.0 - p) * (1.0 - p),
            AdvMode::Dis => p * p,
        }
    }
}

/// Hit and critical-hit probability of a single attack.
///
/// `p_crit` is part of `p_hit`: a critical is a hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitChances {
    pub p_hit: f64,
    pub p_crit: f64,
}

impl HitChances {
    pub const NEVER: Self = Self {
        p_hit: 0.0,
        p_crit: 0.0,
    };

    /// Probability of a hit that is not a critical, never negative.
    pub fn p_non_crit_hit(&self) -> f64 {
        clamp_probability(self.p_hit - self.p_crit)
    }

    /// Expected damage of one attack whose hit deals `on_hit` and whose
    /// critical adds `crit_extra` on top.
    ///
    /// ```text
    /// (p_hit - p_crit) * on_hit + p_crit * (on_hit + crit_extra)
    /// ```
    ///
    /// The hit term is not clamped, so when `p_crit > p_hit` (a target only a
    /// natural 20 reaches) the result reduces to `p_hit * on_hit + p_crit * crit_extra`.
    pub fn expected_damage(&self, on_hit: f64, crit_extra: f64) -> f64 {
        (self.p_hit - self.p_crit) * on_hit + self.p_crit * (on_hit + crit_extra)
    }

    /// Probability of missing entirely.
    pub fn p_miss(&self) -> f64 {
        clamp_probability(1.0 - self.p_hit)
    }
}

/// Lowest natural roll that can crit under the widest supported range.
pub const MIN_CRIT_RANGE: u8 = 18;
/// Default critical range: natural 20 only.
pub const DEFAULT_CRIT_RANGE: u8 = 20;

/// Single-roll hit probability: `clamp((21 + to_hit - ac) / 20, 0, 1)`.
pub fn base_hit_probability(to_hit: f64, target_ac: i32) -> f64 {
    clamp_probability((21.0 + to_hit - f64::from(target_ac)) / 20.0)
}

/// Single-roll critical probability: `(21 - crit_range) / 20`.
///
/// `crit_range` is clamped to 18..=20.
pub fn base_crit_probability(crit_range: u8) -> f64 {
    let crit_range = crit_range.clamp(MIN_CRIT_RANGE, DEFAULT_CRIT_RANGE);
    f64::from(21 - crit_range) / 20.0
}

/// Compute `(p_hit, p_crit)` for an attack, with the roll mode applied to both.
pub fn hit_chances(to_hit: f64, target_ac: i32, crit_range: u8, mode: AdvMode) -> HitChances {
    HitChances {
        p_hit: mode.apply(base_hit_probability(to_hit, target_ac)),
        p_crit: mode.apply(base_crit_probability(crit_range)),
    }
}

/// Clamp to `[0, 1]`, mapping NaN to zero.
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
