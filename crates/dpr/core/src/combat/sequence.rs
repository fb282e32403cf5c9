//! Expected damage of one attack sequence.

use crate::catalog::{FightingStyle, WeaponPreset, WeaponTags};
use crate::config::{AttackerProfile, EngineSettings};
use crate::features::FeatureBundle;
use crate::graph::{ActionType, AttackNode, BuffsNode, FeatsNode, Grip, NodeId};

use super::damage::{DamageType, Dice, die_average, finite_or_zero, rage_bonus};
use super::probability::{HitChances, hit_chances};

/// Archery to-hit bonus with ranged weapons.
pub const ARCHERY_BONUS: f64 = 2.0;
/// Expected value of Bless's +1d4.
pub const BLESS_BONUS: f64 = 2.5;
/// Great Weapon Master / Sharpshooter to-hit penalty.
pub const POWER_ATTACK_PENALTY: f64 = 5.0;
/// Great Weapon Master / Sharpshooter damage bonus.
pub const POWER_ATTACK_DAMAGE: f64 = 10.0;
/// Dueling damage bonus.
pub const DUELING_BONUS: f64 = 2.0;
/// Hex / Hunter's Mark rider die.
pub const ON_HIT_RIDER_FACES: u8 = 6;

/// Everything a sequence needs from its Output's neighbourhood.
#[derive(Clone, Copy, Debug)]
pub struct SequenceContext<'a> {
    pub attacker: &'a AttackerProfile,
    pub settings: &'a EngineSettings,
    pub feats: FeatsNode,
    pub buffs: BuffsNode,
    pub features: &'a FeatureBundle,
    /// Another sequence on the same Output attacks with the off hand.
    pub off_hand_in_use: bool,
}

/// Evaluated attack sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceOutcome {
    /// Attack node this sequence came from; `None` when implied by a feat.
    pub source: Option<NodeId>,
    pub weapon_name: String,
    pub damage_type: DamageType,
    pub tags: WeaponTags,
    pub action_type: ActionType,
    pub to_hit: f64,
    pub chances: HitChances,
    pub attacks: u32,
    /// Damage of a non-critical hit.
    pub base_damage: f64,
    /// Expected damage of one attack, misses included.
    pub per_attack: f64,
    /// `per_attack * attacks`.
    pub dpr: f64,
    pub notes: Vec<String>,
}

impl SequenceOutcome {
    /// Sneak Attack needs a finesse or ranged weapon.
    pub fn qualifies_for_sneak_attack(&self) -> bool {
        self.tags.intersects(WeaponTags::FINESSE | WeaponTags::RANGED)
    }
}

/// Compute to-hit, hit split and expected damage of one sequence.
///
/// ```text
/// per_attack = (p_hit - p_crit) * base + p_crit * (base + dice)
///            + p_crit * brutal_dice * die        (melee only)
/// dpr        = per_attack * attacks_per_round
/// ```
pub fn evaluate_sequence(
    source: Option<NodeId>,
    attack: &AttackNode,
    weapon: &WeaponPreset,
    ctx: &SequenceContext<'_>,
) -> SequenceOutcome {
    let mut notes = Vec::new();
    let features = ctx.features;
    let style = features.style;
    let melee = weapon.is_melee();
    let ranged = weapon.is_ranged();

    // 1. Ability
    let ability_mod = if weapon.uses_dex() {
        ctx.attacker.dex_mod
    } else {
        ctx.attacker.str_mod
    };
    let proficiency = ctx.attacker.proficiency_bonus();

    // 2. To-hit
    let mut to_hit = f64::from(proficiency + ability_mod);
    if style == FightingStyle::Archery && ranged {
        to_hit += ARCHERY_BONUS;
        notes.push(format!("Archery: +2 to hit ({})", weapon.name));
    }
    if ctx.buffs.bless {
        to_hit += BLESS_BONUS;
        notes.push("Bless: +1d4 to hit (+2.5 expected)".to_string());
    }
    let great_weapon_master = ctx.feats.gwm && melee && weapon.has(WeaponTags::GWM);
    let sharpshooter = ctx.feats.ss && ranged && weapon.has(WeaponTags::SS);
    if great_weapon_master {
        to_hit -= POWER_ATTACK_PENALTY;
        notes.push(format!("Great Weapon Master: -5 to hit, +10 damage ({})", weapon.name));
    }
    if sharpshooter {
        to_hit -= POWER_ATTACK_PENALTY;
        notes.push(format!("Sharpshooter: -5 to hit, +10 damage ({})", weapon.name));
    }

    // 3. Hit split
    let chances = hit_chances(
        to_hit,
        ctx.settings.target_ac,
        features.crit_range,
        ctx.settings.adv_mode,
    );

    // 4. Dice
    let (dice, wielded_two_handed) = select_dice(weapon, attack.grip, ctx.settings.use_versatile);
    let great_weapon_fighting =
        style == FightingStyle::GreatWeaponFighting && melee && wielded_two_handed;
    let dice_average = if great_weapon_fighting {
        notes.push(format!(
            "Great Weapon Fighting: re-roll 1s and 2s on {dice} ({})",
            weapon.name
        ));
        dice.average_with_rerolls()
    } else {
        dice.average()
    };

    // 5. Damage of a non-critical hit
    let mut base = dice_average;
    let off_hand = attack.grip == Grip::Off;
    if !off_hand || style == FightingStyle::TwoWeaponFighting {
        base += f64::from(ability_mod);
        if off_hand {
            notes.push("Two-Weapon Fighting: ability modifier added to off-hand damage".to_string());
        }
    }
    let dueling = style == FightingStyle::Dueling
        && melee
        && !wielded_two_handed
        && attack.grip == Grip::Main
        && !ctx.off_hand_in_use;
    if dueling {
        base += DUELING_BONUS;
        notes.push(format!("Dueling: +2 damage ({})", weapon.name));
    }
    if great_weapon_master || sharpshooter {
        base += POWER_ATTACK_DAMAGE;
    }
    if features.hexblade {
        base += f64::from(proficiency);
        notes.push(format!("Hexblade's Curse: +{proficiency} damage per hit"));
    }
    if features.rage && melee {
        let bonus = rage_bonus(ctx.attacker.level);
        base += f64::from(bonus);
        notes.push(format!("Rage: +{bonus} melee damage ({})", weapon.name));
    }
    if ctx.buffs.d6onhit {
        base += die_average(ON_HIT_RIDER_FACES);
        notes.push("Hex/Hunter's Mark: +1d6 per hit".to_string());
    }

    // Penalties cannot make a hit heal the target.
    let base = base.max(0.0);

    // 6. Expected damage per attack
    let mut per_attack = chances.expected_damage(base, dice_average);

    // 7. Brutal Critical
    if features.brutal_crit_dice > 0 && melee {
        let extra = f64::from(features.brutal_crit_dice) * die_average(dice.faces);
        per_attack += chances.p_crit * extra;
        notes.push(format!(
            "Brutal Critical: +{}d{} on crits ({})",
            features.brutal_crit_dice, dice.faces, weapon.name
        ));
    }

    // 8. Per round
    let per_attack = finite_or_zero(per_attack);
    let attacks = attack.attacks_per_round(ctx.attacker.level);

    SequenceOutcome {
        source,
        weapon_name: weapon.name.clone(),
        damage_type: weapon.damage_type,
        tags: weapon.tags,
        action_type: attack.action_type,
        to_hit,
        chances,
        attacks,
        base_damage: finite_or_zero(base),
        per_attack,
        dpr: finite_or_zero(per_attack * f64::from(attacks)),
        notes,
    }
}

/// Damage dice for a grip, and whether the weapon ends up in two hands.
///
/// The versatile die is used for a two-handed grip, for inherently two-handed
/// weapons, and for a main-hand grip when the global versatile toggle is on.
pub fn select_dice(weapon: &WeaponPreset, grip: Grip, use_versatile: bool) -> (Dice, bool) {
    let wants_both_hands = match grip {
        Grip::Both => true,
        Grip::Main => use_versatile,
        Grip::Off => false,
    };
    match weapon.versatile {
        Some(versatile) if wants_both_hands || weapon.is_two_handed() => (versatile, true),
        _ => (weapon.dice, weapon.is_two_handed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogOracle};
    use crate::combat::AdvMode;

    fn weapon(id: &str) -> WeaponPreset {
        Catalog::builtin()
            .weapon(id)
            .cloned()
            .unwrap_or_else(|| panic!("missing weapon {id}"))
    }

    struct Fixture {
        attacker: AttackerProfile,
        settings: EngineSettings,
        feats: FeatsNode,
        buffs: BuffsNode,
        features: FeatureBundle,
    }

    impl Fixture {
        fn new(level: u8, str_mod: i32, dex_mod: i32, ac: i32) -> Self {
            Self {
                attacker: AttackerProfile::new(level, str_mod, dex_mod),
                settings: EngineSettings::default()
                    .with_level(level)
                    .with_target_ac(ac),
                feats: FeatsNode::default(),
                buffs: BuffsNode::default(),
                features: FeatureBundle::new(),
            }
        }

        fn run(&self, attack: &AttackNode) -> SequenceOutcome {
            let ctx = SequenceContext {
                attacker: &self.attacker,
                settings: &self.settings,
                feats: self.feats,
                buffs: self.buffs,
                features: &self.features,
                off_hand_in_use: false,
            };
            evaluate_sequence(None, attack, &weapon(&attack.weapon_id), &ctx)
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn greatsword_baseline() {
        let fixture = Fixture::new(5, 5, 0, 16);
        let attack = AttackNode::new("greatsword", ActionType::Action, Grip::Both);
        let outcome = fixture.run(&attack);
        assert_eq!(outcome.to_hit, 8.0);
        assert_eq!(outcome.chances.p_hit, 0.65);
        assert_eq!(outcome.attacks, 2);
        // 0.60 * 12 + 0.05 * 19 = 8.15 per attack
        assert!(close(outcome.per_attack, 8.15));
        assert!(close(outcome.dpr, 16.3));
    }

    #[test]
    fn great_weapon_master_trades_accuracy_for_damage() {
        let mut fixture = Fixture::new(5, 5, 0, 16);
        fixture.feats.gwm = true;
        let attack = AttackNode::new("greatsword", ActionType::Action, Grip::Both);
        let outcome = fixture.run(&attack);
        assert_eq!(outcome.to_hit, 3.0);
        assert!(close(outcome.chances.p_hit, 0.40));
        assert!(close(outcome.base_damage, 22.0));
        assert!(!outcome.notes.is_empty());
    }

    #[test]
    fn gwm_ignores_weapons_without_the_tag() {
        let mut fixture = Fixture::new(5, 5, 0, 16);
        fixture.feats.gwm = true;
        let attack = AttackNode::new("longsword", ActionType::Action, Grip::Main);
        assert_eq!(fixture.run(&attack).to_hit, 8.0);
    }

    #[test]
    fn archery_and_sharpshooter_apply_to_ranged_only() {
        let mut fixture = Fixture::new(5, 0, 4, 15);
        fixture.features.style = FightingStyle::Archery;
        fixture.feats.ss = true;
        let bow = fixture.run(&AttackNode::new("longbow", ActionType::Action, Grip::Both));
        // 3 + 4 + 2 - 5
        assert_eq!(bow.to_hit, 4.0);
        let rapier = fixture.run(&AttackNode::new("rapier", ActionType::Action, Grip::Main));
        assert_eq!(rapier.to_hit, 7.0);
    }

    #[test]
    fn off_hand_skips_ability_without_two_weapon_fighting() {
        let mut fixture = Fixture::new(1, 0, 3, 10);
        let attack = AttackNode::new("shortsword", ActionType::Bonus, Grip::Off);
        assert!(close(fixture.run(&attack).base_damage, 3.5));

        fixture.features.style = FightingStyle::TwoWeaponFighting;
        assert!(close(fixture.run(&attack).base_damage, 6.5));
    }

    #[test]
    fn versatile_die_follows_grip_and_toggle() {
        let longsword = weapon("longsword");
        assert_eq!(select_dice(&longsword, Grip::Main, false), (Dice::new(1, 8), false));
        assert_eq!(select_dice(&longsword, Grip::Both, false), (Dice::new(1, 10), true));
        assert_eq!(select_dice(&longsword, Grip::Main, true), (Dice::new(1, 10), true));
        assert_eq!(select_dice(&longsword, Grip::Off, true), (Dice::new(1, 8), false));
        let greatsword = weapon("greatsword");
        assert_eq!(select_dice(&greatsword, Grip::Main, false), (Dice::new(2, 6), true));
    }

    #[test]
    fn dueling_needs_a_free_hand() {
        let mut fixture = Fixture::new(1, 3, 0, 10);
        fixture.features.style = FightingStyle::Dueling;
        let main = AttackNode::new("longsword", ActionType::Action, Grip::Main);
        let both = AttackNode::new("longsword", ActionType::Action, Grip::Both);
        assert!(close(fixture.run(&main).base_damage, 4.5 + 3.0 + 2.0));
        assert!(close(fixture.run(&both).base_damage, 5.5 + 3.0));
    }

    #[test]
    fn great_weapon_fighting_boosts_dice_and_crit_dice() {
        let mut fixture = Fixture::new(1, 3, 0, 10);
        fixture.features.style = FightingStyle::GreatWeaponFighting;
        let outcome = fixture.run(&AttackNode::new("greatsword", ActionType::Action, Grip::Both));
        let dice = 25.0 / 3.0;
        assert!(close(outcome.base_damage, dice + 3.0));
        let chances = outcome.chances;
        let expected =
            (chances.p_hit - chances.p_crit) * (dice + 3.0) + chances.p_crit * (2.0 * dice + 3.0);
        assert!(close(outcome.per_attack, expected));
    }

    #[test]
    fn rage_is_melee_only() {
        let mut fixture = Fixture::new(9, 4, 4, 10);
        fixture.features.rage = true;
        let axe = fixture.run(&AttackNode::new("greataxe", ActionType::Action, Grip::Both));
        assert!(close(axe.base_damage, 6.5 + 4.0 + 3.0));
        let bow = fixture.run(&AttackNode::new("shortbow", ActionType::Action, Grip::Both));
        assert!(close(bow.base_damage, 3.5 + 4.0));
    }

    #[test]
    fn brutal_critical_adds_weapon_die_on_crits() {
        let mut fixture = Fixture::new(9, 4, 0, 15);
        let attack = AttackNode::new("greataxe", ActionType::Action, Grip::Both);
        let plain = fixture.run(&attack);
        fixture.features.brutal_crit_dice = 1;
        let brutal = fixture.run(&attack);
        assert!(close(brutal.per_attack - plain.per_attack, plain.chances.p_crit * 6.5));
    }

    #[test]
    fn buffs_and_hexblade() {
        let mut fixture = Fixture::new(5, 0, 4, 15);
        fixture.buffs.bless = true;
        fixture.buffs.d6onhit = true;
        fixture.features.hexblade = true;
        let outcome = fixture.run(&AttackNode::new("rapier", ActionType::Action, Grip::Main));
        assert_eq!(outcome.to_hit, 9.5);
        // 4.5 + 4 + 3 (proficiency) + 3.5 (rider)
        assert!(close(outcome.base_damage, 15.0));
    }

    #[test]
    fn crit_range_widens_crit_chance() {
        let mut fixture = Fixture::new(5, 5, 0, 16);
        fixture.features.crit_range = 19;
        let outcome = fixture.run(&AttackNode::new("greatsword", ActionType::Action, Grip::Both));
        assert!(close(outcome.chances.p_crit, 0.1));
    }

    #[test]
    fn natural_twenty_only_target_scores_crit_dice() {
        // +2 to hit vs AC 30: only a natural 20 lands.
        let fixture = Fixture::new(1, 0, 0, 30);
        let outcome = fixture.run(&AttackNode::new("greatsword", ActionType::Action, Grip::Both));
        assert_eq!(outcome.chances.p_hit, 0.0);
        assert_eq!(outcome.chances.p_crit, 0.05);
        assert_eq!(outcome.attacks, 1);
        // (0 - 0.05) * 7 + 0.05 * (7 + 7)
        assert!(close(outcome.per_attack, 0.35));
        assert!(close(outcome.dpr, 0.35));
    }

    #[test]
    fn advantage_applies_to_both_probabilities() {
        let mut fixture = Fixture::new(5, 5, 0, 16);
        fixture.settings.adv_mode = AdvMode::Adv;
        let outcome = fixture.run(&AttackNode::new("greatsword", ActionType::Action, Grip::Both));
        assert!(close(outcome.chances.p_hit, 1.0 - 0.35 * 0.35));
        assert!(close(outcome.chances.p_crit, 1.0 - 0.95 * 0.95));
    }
}
