//! Starter graph used when nothing usable is on disk.

use dpr_core::{ActionType, AttackNode, Graph, Grip, Node, Position};

pub const SEED_ATTACK_ID: &str = "attack-1";
pub const SEED_OUTPUT_ID: &str = "output-1";

/// One longsword Attack wired into one Output.
pub fn seed_graph() -> Graph {
    let attack = Node::attack(
        SEED_ATTACK_ID,
        AttackNode::new("longsword", ActionType::Action, Grip::Main),
    )
    .at(Position::new(80.0, 120.0));
    let output = Node::output(SEED_OUTPUT_ID).at(Position::new(420.0, 120.0));
    let edge = dpr_core::Edge::new(SEED_ATTACK_ID, SEED_OUTPUT_ID);
    Graph::from_parts(vec![attack, output], vec![edge])
}
