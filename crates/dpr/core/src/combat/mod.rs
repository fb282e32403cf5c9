//! Attack resolution math.
//!
//! - [`probability`]: d20 hit and crit chances under a roll mode
//! - [`damage`]: dice expectations and damage types
//! - [`sequence`]: expected damage of one attack sequence
//! - [`rules`]: once-per-round riders and target defenses
pub mod damage;
pub mod probability;
pub mod rules;
pub mod sequence;

pub use damage::{DamageType, Dice};
pub use probability::{AdvMode, HitChances, hit_chances};
pub use rules::{RoundResolution, resolve_round};
pub use sequence::{SequenceContext, SequenceOutcome, evaluate_sequence};
