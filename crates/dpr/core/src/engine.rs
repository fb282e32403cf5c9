//! Graph evaluation.
//!
//! The [`DprEngine`] reads a [`Graph`] and produces one [`Summary`] per Output
//! node. Each Output only looks at its direct incoming neighbours:
//!
//! ```text
//! Attack* ─┐
//! Feats?  ─┤
//! Features*├─> Output ─> sequences ─> resolve_round ─> Summary
//! Buffs?  ─┘
//! ```
//!
//! Evaluation is a pure function of the graph, the settings and the attacker
//! profile. [`DprEngine::refresh`] computes every summary before writing any
//! of them back.

use crate::catalog::{CatalogOracle, WeaponPreset, WeaponTags};
use crate::combat::damage::DamageType;
use crate::combat::sequence::select_dice;
use crate::combat::{
    Dice, SequenceContext, SequenceOutcome, evaluate_sequence, resolve_round,
};
use crate::config::{AttackerProfile, EngineSettings};
use crate::features::{FeatureBundle, FeatureNode};
use crate::graph::{
    ActionType, AttackNode, BuffsNode, FeatsNode, Graph, Grip, NodeId, NodeKind,
    SequenceBreakdown, Summary,
};

/// Die of a Polearm Master butt-end attack.
pub const BUTT_END_DICE: Dice = Dice::new(1, 4);

/// Summaries of every Output node, in graph order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
    summaries: Vec<(NodeId, Option<Summary>)>,
}

impl Evaluation {
    /// Summary of one Output; `None` when it is unknown or has no Attack input.
    pub fn get(&self, output: &NodeId) -> Option<&Summary> {
        self.summaries
            .iter()
            .find(|(id, _)| id == output)
            .and_then(|(_, summary)| summary.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Option<&Summary>)> {
        self.summaries
            .iter()
            .map(|(id, summary)| (id, summary.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn into_inner(self) -> Vec<(NodeId, Option<Summary>)> {
        self.summaries
    }
}

/// Direct neighbours of one Output, partitioned by kind.
#[derive(Debug, Default)]
struct Inputs<'g> {
    attacks: Vec<(&'g NodeId, &'g AttackNode)>,
    feats: Option<FeatsNode>,
    features: Vec<&'g FeatureNode>,
    buffs: Option<BuffsNode>,
}

impl<'g> Inputs<'g> {
    fn collect(graph: &'g Graph, output: &'g NodeId) -> Self {
        let mut inputs = Self::default();
        for node in graph.incoming(output) {
            match &node.kind {
                NodeKind::Attack(attack) => inputs.attacks.push((&node.id, attack)),
                NodeKind::Feats(feats) => {
                    inputs.feats.get_or_insert(*feats);
                }
                NodeKind::Features(feature) => inputs.features.push(feature),
                NodeKind::Buffs(buffs) => {
                    inputs.buffs.get_or_insert(*buffs);
                }
                NodeKind::Output(_) => {}
            }
        }
        inputs
    }
}

/// Evaluates Output nodes against a catalog and global settings.
pub struct DprEngine<'a, C: CatalogOracle + ?Sized> {
    catalog: &'a C,
    settings: &'a EngineSettings,
    attacker: AttackerProfile,
}

impl<'a, C: CatalogOracle + ?Sized> DprEngine<'a, C> {
    /// Engine whose attacker is derived from `settings`.
    pub fn new(catalog: &'a C, settings: &'a EngineSettings) -> Self {
        Self {
            catalog,
            settings,
            attacker: AttackerProfile::from_settings(settings),
        }
    }

    /// Prefer a character-builder profile over the settings' level and scores.
    pub fn with_builder(mut self, builder: Option<AttackerProfile>) -> Self {
        self.attacker = AttackerProfile::resolve(self.settings, builder);
        self
    }

    pub fn attacker(&self) -> &AttackerProfile {
        &self.attacker
    }

    pub fn settings(&self) -> &EngineSettings {
        self.settings
    }

    /// Evaluate every Output node of `graph`.
    pub fn evaluate(&self, graph: &Graph) -> Evaluation {
        let summaries = graph
            .outputs()
            .map(|node| (node.id.clone(), self.evaluate_output(graph, &node.id)))
            .collect();
        Evaluation { summaries }
    }

    /// Evaluate every Output and store the summaries on the nodes.
    ///
    /// Returns the number of Output nodes that received a summary.
    pub fn refresh(&self, graph: &mut Graph) -> usize {
        let evaluation = self.evaluate(graph);
        let mut written = 0;
        for (id, summary) in evaluation.into_inner() {
            if summary.is_some() {
                written += 1;
            }
            if let Some(NodeKind::Output(output)) = graph.node_mut(&id).map(|node| &mut node.kind) {
                output.summary = summary;
            }
        }
        tracing::debug!(outputs = graph.outputs().count(), written, "refreshed graph");
        written
    }

    /// Evaluate one Output node.
    ///
    /// `None` when `output` is not an Output node, when nothing of kind Attack
    /// feeds it, or when no weapon could be resolved.
    pub fn evaluate_output(&self, graph: &Graph, output: &NodeId) -> Option<Summary> {
        graph.output(output).ok()?;
        let inputs = Inputs::collect(graph, output);
        if inputs.attacks.is_empty() {
            tracing::debug!(output = %output, "no attack inputs");
            return None;
        }

        let features = FeatureBundle::from_nodes(inputs.features.iter().copied());
        let feats = inputs.feats.unwrap_or_default();
        let ctx = SequenceContext {
            attacker: &self.attacker,
            settings: self.settings,
            feats,
            buffs: inputs.buffs.unwrap_or_default(),
            features: &features,
            off_hand_in_use: inputs
                .attacks
                .iter()
                .any(|(_, attack)| attack.grip == Grip::Off),
        };

        let mut notes = Vec::new();
        let mut sequences: Vec<SequenceOutcome> = Vec::with_capacity(inputs.attacks.len() + 1);
        for (id, attack) in &inputs.attacks {
            let Some(weapon) = self.catalog.weapon_or_default(&attack.weapon_id) else {
                tracing::warn!(node = %id, "weapon catalog is empty");
                continue;
            };
            sequences.push(evaluate_sequence(Some((*id).clone()), attack, weapon, &ctx));
        }

        if let Some(outcome) = feats
            .pam
            .then(|| self.polearm_butt_end(&inputs.attacks, &ctx))
            .flatten()
        {
            notes.push(format!(
                "Polearm Master: bonus-action butt-end attack ({BUTT_END_DICE} bludgeoning)"
            ));
            sequences.push(outcome);
        }

        if sequences.is_empty() {
            return None;
        }

        if feats.cbe && sequences.iter().any(|seq| seq.tags.contains(WeaponTags::LOADING)) {
            notes.push("Crossbow Expert: loading property ignored".to_string());
        }

        let round = resolve_round(&sequences, &features, &self.attacker, self.settings);

        let mut all_notes: Vec<String> = Vec::new();
        let note_sources = sequences
            .iter()
            .flat_map(|seq| seq.notes.iter())
            .chain(notes.iter())
            .chain(round.notes.iter());
        for note in note_sources {
            if !all_notes.contains(note) {
                all_notes.push(note.clone());
            }
        }

        let first = &sequences[0];
        let summary = Summary {
            to_hit: sequences
                .iter()
                .map(|seq| seq.to_hit)
                .fold(f64::NEG_INFINITY, f64::max),
            adv_mode: self.settings.adv_mode,
            target_ac: self.settings.target_ac,
            p_hit: first.chances.p_hit,
            p_crit: first.chances.p_crit,
            attacks: sequences.iter().map(|seq| seq.attacks).sum(),
            dpr: round.dpr,
            notes: all_notes,
            sequences: sequences.iter().map(breakdown).collect(),
        };

        tracing::debug!(
            output = %output,
            sequences = sequences.len(),
            dpr = summary.dpr,
            "evaluated output"
        );
        Some(summary)
    }

    /// Implied Polearm Master bonus attack, if the round allows one.
    ///
    /// Requires an `action` sequence with a polearm and no explicit `bonus`
    /// sequence on the same Output.
    fn polearm_butt_end(
        &self,
        attacks: &[(&NodeId, &AttackNode)],
        ctx: &SequenceContext<'_>,
    ) -> Option<SequenceOutcome> {
        if attacks
            .iter()
            .any(|(_, attack)| attack.action_type == ActionType::Bonus)
        {
            return None;
        }
        let (attack, polearm) = attacks.iter().find_map(|(_, attack)| {
            if attack.action_type != ActionType::Action {
                return None;
            }
            let weapon = self.catalog.weapon_or_default(&attack.weapon_id)?;
            weapon.has(WeaponTags::POLEARM).then_some((*attack, weapon))
        })?;

        let butt = butt_end_of(polearm, attack.grip, self.settings.use_versatile);
        let butt_attack = AttackNode::new(butt.id.clone(), ActionType::Bonus, attack.grip);
        Some(evaluate_sequence(None, &butt_attack, &butt, ctx))
    }
}

/// The butt end of a polearm as a weapon of its own.
fn butt_end_of(polearm: &WeaponPreset, grip: Grip, use_versatile: bool) -> WeaponPreset {
    let (_, two_handed) = select_dice(polearm, grip, use_versatile);
    let mut tags = polearm.tags - WeaponTags::VERSATILE - WeaponTags::POLEARM;
    if two_handed {
        tags |= WeaponTags::TWO_HANDED;
    }
    WeaponPreset::new(
        &format!("{}-butt", polearm.id),
        &format!("{} (butt end)", polearm.name),
        BUTT_END_DICE,
        DamageType::Bludgeoning,
        tags,
    )
}

fn breakdown(seq: &SequenceOutcome) -> SequenceBreakdown {
    SequenceBreakdown {
        source: seq.source.clone(),
        weapon: seq.weapon_name.clone(),
        action_type: seq.action_type,
        to_hit: seq.to_hit,
        p_hit: seq.chances.p_hit,
        p_crit: seq.chances.p_crit,
        attacks: seq.attacks,
        dpr: seq.dpr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::graph::Node;

    fn graph_with(attacks: &[(&str, AttackNode)]) -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::output("out")).unwrap();
        for (id, attack) in attacks {
            graph.add_node(Node::attack(id, attack.clone())).unwrap();
            graph.connect(*id, "out").unwrap();
        }
        graph
    }

    #[test]
    fn output_without_attacks_has_no_summary() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let mut graph = graph_with(&[]);
        graph.add_node(Node::feats("f", FeatsNode::default())).unwrap();
        graph.connect("f", "out").unwrap();

        let engine = DprEngine::new(&catalog, &settings);
        assert_eq!(engine.evaluate_output(&graph, &"out".into()), None);
        assert_eq!(engine.refresh(&mut graph), 0);
    }

    #[test]
    fn non_output_ids_are_ignored() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let graph = graph_with(&[(
            "a",
            AttackNode::new("longsword", ActionType::Action, Grip::Main),
        )]);
        let engine = DprEngine::new(&catalog, &settings);
        assert_eq!(engine.evaluate_output(&graph, &"a".into()), None);
        assert!(engine.evaluate_output(&graph, &"out".into()).is_some());
    }

    #[test]
    fn unknown_weapon_falls_back_to_longsword() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let engine = DprEngine::new(&catalog, &settings);
        let unknown = graph_with(&[("a", AttackNode::new("spork", ActionType::Action, Grip::Main))]);
        let known = graph_with(&[(
            "a",
            AttackNode::new("longsword", ActionType::Action, Grip::Main),
        )]);
        let out = NodeId::from("out");
        assert_eq!(
            engine.evaluate_output(&unknown, &out),
            engine.evaluate_output(&known, &out)
        );
    }

    #[test]
    fn polearm_master_adds_butt_end_sequence() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let engine = DprEngine::new(&catalog, &settings);
        let mut graph = graph_with(&[(
            "a",
            AttackNode::new("glaive", ActionType::Action, Grip::Both),
        )]);
        let plain = engine.evaluate_output(&graph, &"out".into()).unwrap();

        graph
            .add_node(Node::feats(
                "f",
                FeatsNode {
                    pam: true,
                    ..FeatsNode::default()
                },
            ))
            .unwrap();
        graph.connect("f", "out").unwrap();
        let with_pam = engine.evaluate_output(&graph, &"out".into()).unwrap();

        assert_eq!(with_pam.sequences.len(), 2);
        assert_eq!(with_pam.sequences[1].source, None);
        assert_eq!(with_pam.sequences[1].action_type, ActionType::Bonus);
        assert_eq!(with_pam.attacks, plain.attacks + 1);
        assert!(with_pam.dpr > plain.dpr);
    }

    #[test]
    fn polearm_master_defers_to_explicit_bonus_attack() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let engine = DprEngine::new(&catalog, &settings);
        let mut graph = graph_with(&[
            ("a", AttackNode::new("glaive", ActionType::Action, Grip::Both)),
            ("b", AttackNode::new("dagger", ActionType::Bonus, Grip::Off)),
        ]);
        graph
            .add_node(Node::feats(
                "f",
                FeatsNode {
                    pam: true,
                    ..FeatsNode::default()
                },
            ))
            .unwrap();
        graph.connect("f", "out").unwrap();
        let summary = engine.evaluate_output(&graph, &"out".into()).unwrap();
        assert_eq!(summary.sequences.len(), 2);
    }

    #[test]
    fn butt_end_keeps_two_handed_grip() {
        let catalog = Catalog::builtin();
        let quarterstaff = catalog.weapon("quarterstaff").unwrap();
        let butt = butt_end_of(quarterstaff, Grip::Both, false);
        assert_eq!(butt.dice, BUTT_END_DICE);
        assert_eq!(butt.damage_type, DamageType::Bludgeoning);
        assert!(butt.is_two_handed());
        assert!(butt.versatile.is_none());

        let one_handed = butt_end_of(quarterstaff, Grip::Main, false);
        assert!(!one_handed.is_two_handed());
    }

    #[test]
    fn first_feats_node_wins() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let engine = DprEngine::new(&catalog, &settings);
        let mut graph = graph_with(&[(
            "a",
            AttackNode::new("greatsword", ActionType::Action, Grip::Both),
        )]);
        let gwm = FeatsNode {
            gwm: true,
            ..FeatsNode::default()
        };
        graph.add_node(Node::feats("f1", FeatsNode::default())).unwrap();
        graph.add_node(Node::feats("f2", gwm)).unwrap();
        graph.connect("f1", "out").unwrap();
        graph.connect("f2", "out").unwrap();
        let summary = engine.evaluate_output(&graph, &"out".into()).unwrap();
        // STR 16 (+3), level 5 (+3): no -5 applied.
        assert_eq!(summary.to_hit, 6.0);
    }

    #[test]
    fn crossbow_expert_is_a_note_only() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let engine = DprEngine::new(&catalog, &settings);
        let mut graph = graph_with(&[(
            "a",
            AttackNode::new("hand-crossbow", ActionType::Action, Grip::Main),
        )]);
        let without = engine.evaluate_output(&graph, &"out".into()).unwrap();
        graph
            .add_node(Node::feats(
                "f",
                FeatsNode {
                    cbe: true,
                    ..FeatsNode::default()
                },
            ))
            .unwrap();
        graph.connect("f", "out").unwrap();
        let with = engine.evaluate_output(&graph, &"out".into()).unwrap();
        assert_eq!(with.dpr, without.dpr);
        assert!(with.notes.iter().any(|note| note.starts_with("Crossbow Expert")));
    }

    #[test]
    fn builder_profile_overrides_settings() {
        let catalog = Catalog::builtin();
        let settings = EngineSettings::default();
        let graph = graph_with(&[(
            "a",
            AttackNode::new("longsword", ActionType::Action, Grip::Main),
        )]);
        let engine =
            DprEngine::new(&catalog, &settings).with_builder(Some(AttackerProfile::new(11, 5, 0)));
        let summary = engine.evaluate_output(&graph, &"out".into()).unwrap();
        assert_eq!(summary.attacks, 3);
        assert_eq!(summary.to_hit, 9.0);
    }
}
