pub mod classifier;
pub mod error;
pub mod path;
pub mod rules;

pub use classifier::{PathClassifier, PathDecision, Verdict};
pub use error::AccessError;
pub use path::normalize;
pub use rules::{Rule, RuleSet};
