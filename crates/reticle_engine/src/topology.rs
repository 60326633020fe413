//! Read-only views of a network's shape and size.

use std::fmt;

use crate::alpha::AlphaId;
use crate::join::{JoinChild, JoinId};
use crate::network::ReteNetwork;
use crate::production::ProductionId;

// =============================================================================
// Statistics
// =============================================================================

/// Node and memory counts for one engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkStats {
    /// Distinct alpha memories.
    pub alpha_memories: usize,
    /// Join nodes across every production.
    pub join_nodes: usize,
    /// Registered productions.
    pub productions: usize,
    /// Live tokens, excluding the root token.
    pub tokens: usize,
    /// Facts in working memory.
    pub facts: usize,
    /// Productions with at least one surviving match.
    pub satisfied: usize,
    /// Complete matches held back by a filter.
    pub rejected: usize,
}

impl NetworkStats {
    pub(crate) fn of(network: &ReteNetwork) -> Self {
        Self {
            alpha_memories: network.alphas().count(),
            join_nodes: network.joins().count(),
            productions: network.productions().count(),
            tokens: network.token_count(),
            facts: network.memory().len(),
            satisfied: network
                .productions()
                .filter(|(_, p)| p.is_satisfied())
                .count(),
            rejected: network
                .productions()
                .map(|(_, p)| p.rejected_count())
                .sum(),
        }
    }
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nodes: α:{}, β:{}, P:{} ({} satisfied), Tokens: {} ({} rejected), Facts: {}",
            self.alpha_memories,
            self.join_nodes,
            self.productions,
            self.satisfied,
            self.tokens,
            self.rejected,
            self.facts
        )
    }
}

// =============================================================================
// Topology
// =============================================================================

/// A node of the network graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRef {
    /// An alpha memory.
    Alpha(AlphaId),
    /// A join node.
    Join(JoinId),
    /// A production's terminal node.
    Production(ProductionId),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpha(id) => write!(f, "α{}", id.raw()),
            Self::Join(id) => write!(f, "β{}", id.raw()),
            Self::Production(id) => write!(f, "P{}", id.raw()),
        }
    }
}

/// A labelled node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologyNode {
    /// Node handle.
    pub node: NodeRef,
    /// Alpha key, condition position, or production name.
    pub label: String,
}

/// Snapshot of every node and the edges that carry activations between them.
///
/// Edges run from an alpha memory to each join it feeds, from each join to
/// the next join of its production, and from the last join to the terminal
/// node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkTopology {
    /// Nodes, alpha memories first, then joins, then productions.
    pub nodes: Vec<TopologyNode>,
    /// Directed edges.
    pub edges: Vec<(NodeRef, NodeRef)>,
}

impl NetworkTopology {
    pub(crate) fn of(network: &ReteNetwork) -> Self {
        let mut topology = Self::default();

        for (id, alpha) in network.alphas() {
            topology.nodes.push(TopologyNode {
                node: NodeRef::Alpha(id),
                label: alpha.key.to_string(),
            });
            for &join in &alpha.successors {
                topology.edges.push((NodeRef::Alpha(id), NodeRef::Join(join)));
            }
        }

        let name_of = |id: ProductionId| {
            network
                .productions()
                .find(|(p, _)| *p == id)
                .map_or("", |(_, node)| node.name.as_str())
        };
        for (id, join) in network.joins() {
            topology.nodes.push(TopologyNode {
                node: NodeRef::Join(id),
                label: format!("{}[{}]", name_of(join.production), join.index),
            });
            let child = match join.child {
                JoinChild::Join(next) => NodeRef::Join(next),
                JoinChild::Production(p) => NodeRef::Production(p),
            };
            topology.edges.push((NodeRef::Join(id), child));
        }

        for (id, production) in network.productions() {
            topology.nodes.push(TopologyNode {
                node: NodeRef::Production(id),
                label: production.name.clone(),
            });
        }
        topology
    }

    /// Nodes reached directly from `node`.
    pub fn successors(&self, node: NodeRef) -> impl Iterator<Item = NodeRef> + '_ {
        self.edges
            .iter()
            .filter(move |(from, _)| *from == node)
            .map(|(_, to)| *to)
    }

    /// Label of a node, if it is part of the snapshot.
    #[must_use]
    pub fn label(&self, node: NodeRef) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.node == node)
            .map(|n| n.label.as_str())
    }

    /// Alpha memories in the snapshot.
    pub fn alpha_memories(&self) -> impl Iterator<Item = &TopologyNode> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.node, NodeRef::Alpha(_)))
    }
}

impl fmt::Display for NetworkTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{} {}", node.node, node.label)?;
            let targets: Vec<String> = self
                .successors(node.node)
                .map(|to| to.to_string())
                .collect();
            if !targets.is_empty() {
                write!(f, " -> {}", targets.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
