//! The user-wired evaluation graph.
//!
//! Only direct incoming edges of an Output node are consulted; there is no
//! transitive walk. Cycles are therefore harmless and are not rejected.
mod node;
mod summary;

pub use node::{
    ActionType, AttackNode, BuffsNode, FeatsNode, Grip, Node, NodeId, NodeKind, OutputNode,
    Position,
};
pub use summary::{SequenceBreakdown, Summary};

use crate::error::{DprError, ErrorSeverity};

/// Directed, unweighted edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{source}-{target}"),
            source,
            target,
        }
    }
}

/// Nodes and edges as edited by the user.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw parts without validation (e.g. an imported document).
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| &node.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Insert a node, rejecting duplicate ids.
    pub fn add_node(&mut self, node: Node) -> Result<&mut Self, GraphError> {
        if self.contains(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(self)
    }

    /// Connect two existing nodes.
    pub fn connect(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Result<&mut Self, GraphError> {
        let edge = Edge::new(source, target);
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains(endpoint) {
                return Err(GraphError::MissingNode(endpoint.clone()));
            }
        }
        self.edges.push(edge);
        Ok(self)
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|node| &node.id == id)?;
        self.edges
            .retain(|edge| &edge.source != id && &edge.target != id);
        Some(self.nodes.remove(index))
    }

    /// Direct sources of `target`, in edge order, each at most once.
    ///
    /// Edges whose source does not exist are skipped.
    pub fn incoming<'a>(&'a self, target: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        let mut seen: Vec<&NodeId> = Vec::new();
        self.edges
            .iter()
            .filter(move |edge| &edge.target == target)
            .filter_map(move |edge| {
                if seen.contains(&&edge.source) {
                    return None;
                }
                seen.push(&edge.source);
                self.node(&edge.source)
            })
    }

    /// All Output nodes.
    pub fn outputs(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_output())
    }

    /// Look up an Output node by id.
    pub fn output(&self, id: &NodeId) -> Result<&Node, GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::MissingNode(id.clone()))?;
        if !node.is_output() {
            return Err(GraphError::NotAnOutput {
                id: id.clone(),
                kind: node.kind.name(),
            });
        }
        Ok(node)
    }
}

/// Errors from graph-editing operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node '{0}' already exists")]
    DuplicateNode(NodeId),

    #[error("node '{0}' does not exist")]
    MissingNode(NodeId),

    #[error("node '{id}' is a {kind} node, not an output")]
    NotAnOutput { id: NodeId, kind: &'static str },
}

impl DprError for GraphError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            GraphError::DuplicateNode(_) => "GRAPH_DUPLICATE_NODE",
            GraphError::MissingNode(_) => "GRAPH_MISSING_NODE",
            GraphError::NotAnOutput { .. } => "GRAPH_NOT_AN_OUTPUT",
        }
    }
}
