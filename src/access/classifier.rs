use serde::Serialize;

use super::path::{decode, normalize};
use super::rules::RuleSet;
use crate::audit::{EventLevel, EventSink};

/// Outcome of classifying a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allowed,
    Denied,
    /// No rule matched; treated as allowed by callers after an audit event
    Unknown,
}

/// Classification result, carrying both path forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathDecision {
    pub verdict: Verdict,
    pub original: String,
    pub normalized: String,
    /// Source of the rule that decided, if any
    pub rule: Option<String>,
}

impl PathDecision {
    /// The unnormalized path to forward, or `None` when the path is denied
    pub fn forward_path(&self) -> Option<&str> {
        match self.verdict {
            Verdict::Denied => None,
            Verdict::Allowed | Verdict::Unknown => Some(&self.original),
        }
    }

    pub fn is_denied(&self) -> bool {
        self.verdict == Verdict::Denied
    }
}

/// Ordered deny/allow path classifier. Stateless apart from the compiled rules,
/// so one instance can be shared across request tasks.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    rules: RuleSet,
}

impl PathClassifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Classify `raw_path` against the deny list, then the allow list.
    ///
    /// Matching happens on the percent-decoded, normalized path, so escaped
    /// spellings of a denied path are still denied. A path matching no rule is
    /// `Unknown` and exactly one warning is emitted to `sink`.
    pub fn classify(&self, raw_path: &str, sink: &dyn EventSink) -> PathDecision {
        let normalized = normalize(&decode(raw_path));

        if let Some(rule) = self.rules.first_deny(&normalized) {
            return PathDecision {
                verdict: Verdict::Denied,
                original: raw_path.to_string(),
                normalized,
                rule: Some(rule.as_str().to_string()),
            };
        }

        if let Some(rule) = self.rules.first_allow(&normalized) {
            return PathDecision {
                verdict: Verdict::Allowed,
                original: raw_path.to_string(),
                normalized,
                rule: Some(rule.as_str().to_string()),
            };
        }

        sink.log(
            EventLevel::Warn,
            &["access", "path:unknown"],
            &format!(
                "unclassified path allowed: original={} normalized={}",
                raw_path, normalized
            ),
        );

        PathDecision {
            verdict: Verdict::Unknown,
            original: raw_path.to_string(),
            normalized,
            rule: None,
        }
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(RuleSet::defaults())
    }
}
