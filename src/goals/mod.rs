//! Goal graphs: objective templates, generation and dream insertions

pub mod generator;
pub mod graph;
pub mod templates;

pub use generator::{append_dream_node, generate_graph};
pub use graph::{GoalNode, NodeOrigin, NodeStatus, RequirementGraph};
pub use templates::{GoalTemplate, TEMPLATES};
