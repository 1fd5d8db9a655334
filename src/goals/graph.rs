//! Requirement graph: an append-only DAG of objectives
//!
//! A node may only reference prerequisites that already exist, so insertion
//! order is a topological order and cycles cannot form. Nodes move from
//! unmet to met and never back.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{Domain, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Unmet,
    Met,
}

/// Where a node came from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeOrigin {
    Initial,
    Dream { domain: Domain, threshold: f64, tick: Tick },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalNode {
    pub id: String,
    /// Template the node was drawn from; rules are keyed by it
    pub template: String,
    pub label: String,
    /// Primary domain first
    pub domains: Vec<Domain>,
    /// 1 = basic, 2 = intermediate, 3 = ultimate
    pub tier: u8,
    pub needs: Vec<String>,
    pub status: NodeStatus,
    pub origin: NodeOrigin,
}

impl GoalNode {
    pub fn is_met(&self) -> bool {
        self.status == NodeStatus::Met
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementGraph {
    nodes: Vec<GoalNode>,
}

impl RequirementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[GoalNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&GoalNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Append a node. Duplicate ids and unknown prerequisites are rejected.
    pub fn add_node(&mut self, node: GoalNode) -> Result<()> {
        if self.contains(&node.id) {
            return Err(SimError::InvalidArgument(format!("duplicate goal node '{}'", node.id)));
        }
        if let Some(missing) = node.needs.iter().find(|n| !self.contains(n)) {
            return Err(SimError::InvalidArgument(format!(
                "goal node '{}' needs unknown node '{}'",
                node.id, missing
            )));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Mark a node met. Returns true if the status changed.
    pub fn mark_met(&mut self, id: &str) -> Result<bool> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| SimError::InvalidArgument(format!("unknown goal node '{}'", id)))?;
        if node.is_met() {
            return Ok(false);
        }
        node.status = NodeStatus::Met;
        Ok(true)
    }

    /// Every prerequisite of `node` is met
    pub fn is_ready(&self, node: &GoalNode) -> bool {
        node.needs
            .iter()
            .all(|id| self.node(id).is_some_and(|n| n.is_met()))
    }

    /// Unmet nodes whose prerequisites are all met, in insertion order
    pub fn ready_unmet(&self) -> Vec<&GoalNode> {
        self.nodes
            .iter()
            .filter(|n| !n.is_met() && self.is_ready(n))
            .collect()
    }

    pub fn unmet(&self) -> impl Iterator<Item = &GoalNode> {
        self.nodes.iter().filter(|n| !n.is_met())
    }

    pub fn met_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_met()).count()
    }

    /// At least one node can be pursued with no prerequisites
    pub fn has_root(&self) -> bool {
        self.nodes.iter().any(|n| n.needs.is_empty())
    }
}

#[cfg(test)]
pub(crate) fn test_node(id: &str, domain: Domain, needs: &[&str]) -> GoalNode {
    GoalNode {
        id: id.to_string(),
        template: id.to_string(),
        label: id.replace('_', " "),
        domains: vec![domain],
        tier: if needs.is_empty() { 1 } else { 2 },
        needs: needs.iter().map(|s| s.to_string()).collect(),
        status: NodeStatus::Unmet,
        origin: NodeOrigin::Initial,
    }
}
