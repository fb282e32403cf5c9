//! Once-per-round riders and target defenses.
//!
//! These apply to the round as a whole rather than to a single sequence:
//!
//! ```text
//! total = Σ sequence.dpr
//!       + sneak attack   (at most once per round)
//!       + divine smite   (first action sequence)
//!       + maneuvers      (first action sequence)
//! total = total × resistance/vulnerability (single damage type only)
//! ```

use crate::config::{AttackerProfile, EngineSettings};
use crate::features::FeatureBundle;
use crate::graph::ActionType;

use super::damage::{DamageType, d6_pool, d8_pool, die_average, finite_or_zero};
use super::sequence::SequenceOutcome;

/// Sneak Attack dice never exceed this.
pub const MAX_SNEAK_ATTACK_DICE: u32 = 10;

/// Total expected damage of a round plus the notes it produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundResolution {
    pub dpr: f64,
    pub notes: Vec<String>,
}

/// Sneak Attack d6 count at `level`: `ceil(level / 2)`, at most ten.
pub fn sneak_attack_dice(level: u8) -> u32 {
    u32::from(level).div_ceil(2).min(MAX_SNEAK_ATTACK_DICE)
}

/// Probability that at least one qualifying attack hits this round.
///
/// ```text
/// P(any) = 1 - Π (1 - p_hit_i)^attacks_i
/// ```
pub fn sneak_attack_chance(sequences: &[SequenceOutcome]) -> f64 {
    let all_miss = sequences
        .iter()
        .filter(|seq| seq.qualifies_for_sneak_attack())
        .fold(1.0, |acc, seq| {
            acc * (1.0 - seq.chances.p_hit).powi(seq.attacks as i32)
        });
    1.0 - all_miss
}

/// Fold the per-sequence results into the round total.
pub fn resolve_round(
    sequences: &[SequenceOutcome],
    features: &FeatureBundle,
    attacker: &AttackerProfile,
    settings: &EngineSettings,
) -> RoundResolution {
    let mut notes = Vec::new();
    let mut total: f64 = sequences.iter().map(|seq| seq.dpr).sum();

    if features.sneak_attack
        && sequences.iter().any(SequenceOutcome::qualifies_for_sneak_attack)
    {
        let dice = sneak_attack_dice(attacker.level);
        let chance = sneak_attack_chance(sequences);
        let added = chance * d6_pool(dice);
        total += added;
        notes.push(format!(
            "Sneak Attack: {dice}d6 once per round, {:.1}% chance (+{added:.2})",
            chance * 100.0
        ));
    }

    let first_action = sequences
        .iter()
        .find(|seq| seq.action_type == ActionType::Action);

    if let Some(seq) = first_action.filter(|_| features.smite.is_active()) {
        let dice = u32::from(features.smite.dice());
        let average = d8_pool(dice);
        let added = seq.chances.expected_damage(average, average);
        total += added;
        notes.push(format!(
            "Divine Smite: {dice}d8 on first action hit (+{added:.2})"
        ));
    }

    if let Some(seq) = first_action.filter(|_| features.maneuvers_per_round > 0) {
        let faces = features.maneuver_die_faces();
        let average = die_average(faces);
        let added =
            f64::from(features.maneuvers_per_round) * seq.chances.expected_damage(average, average);
        total += added;
        notes.push(format!(
            "Maneuvers: {}x d{faces} per round (+{added:.2})",
            features.maneuvers_per_round
        ));
    }

    if let Some(damage_type) = shared_damage_type(sequences) {
        if settings.resist == Some(damage_type) {
            total *= 0.5;
            notes.push(format!("Target resists {damage_type}: damage halved"));
        }
        if settings.vuln == Some(damage_type) {
            total *= 2.0;
            notes.push(format!("Target is vulnerable to {damage_type}: damage doubled"));
        }
    }

    RoundResolution {
        dpr: finite_or_zero(total),
        notes,
    }
}

/// The damage type every sequence deals, if they all agree.
fn shared_damage_type(sequences: &[SequenceOutcome]) -> Option<DamageType> {
    let (first, rest) = sequences.split_first()?;
    rest.iter()
        .all(|seq| seq.damage_type == first.damage_type)
        .then_some(first.damage_type)
}
