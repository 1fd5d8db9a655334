//! Rule base: typed effects, conditions and risks loaded from TOML

pub mod condition;
pub mod effect;
pub mod knowledge;
mod loader;
pub mod risk;

pub use condition::{CmpOp, Condition, Subject};
pub use effect::Effect;
pub use knowledge::{GeneratorRule, KnowledgeBase, RequirementRule, RulePath};
pub use loader::{load_rule_base, parse_rule_base};
pub use risk::{Risk, RiskKind};
