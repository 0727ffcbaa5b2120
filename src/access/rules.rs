use regex::{Regex, RegexBuilder};

use super::error::AccessError;

/// Paths that must never reach the dashboard even when an allow rule matches
pub const DEFAULT_DENY_RULES: &[&str] = &[
    r"^/?app/dev_tools",
    r"^/?api/console/",
    r"^/?app/management/(kibana/settings|data|stack)",
    r"^/?elasticsearch/",
    r"^/?internal/search/",
    r"^/?api/kibana/suggestions/",
];

/// Paths known to be safe to forward unmodified
pub const DEFAULT_ALLOW_RULES: &[&str] = &[
    r"^/?([0-9]+/)?bundles/",
    r"^/?([0-9]+/)?built_assets/",
    r"^/?ui/",
    r"^/?translations/",
    r"^/?app/(home|kibana|discover|dashboards|visualize|management)",
    r"^/?api/(core/capabilities|saved_objects/|status|licensing/info)",
    r"^/?(login|logout|account|session|health)/?$",
    r"^/?_filtered_(msearch|internal_search)$",
    r"^/?[^/]+/_filtered_(search|suggestions)$",
];

/// A single ordered path rule, matched without regard to case
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
}

impl Rule {
    pub fn new(pattern: &str, list: &'static str) -> Result<Self, AccessError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| AccessError::InvalidRule {
                list,
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, normalized_path: &str) -> bool {
        self.pattern.is_match(normalized_path)
    }
}

/// Deny and allow rule lists, each evaluated in declaration order
#[derive(Debug, Clone)]
pub struct RuleSet {
    deny: Vec<Rule>,
    allow: Vec<Rule>,
}

impl RuleSet {
    pub fn compile<D, A>(deny: &[D], allow: &[A]) -> Result<Self, AccessError>
    where
        D: AsRef<str>,
        A: AsRef<str>,
    {
        let deny = deny
            .iter()
            .map(|p| Rule::new(p.as_ref(), "deny"))
            .collect::<Result<Vec<_>, _>>()?;
        let allow = allow
            .iter()
            .map(|p| Rule::new(p.as_ref(), "allow"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { deny, allow })
    }

    pub fn defaults() -> Self {
        // The default tables are compile-time constants covered by tests.
        Self::compile(DEFAULT_DENY_RULES, DEFAULT_ALLOW_RULES)
            .unwrap_or_else(|e| panic!("default access rules are invalid: {e}"))
    }

    pub fn first_deny(&self, normalized_path: &str) -> Option<&Rule> {
        self.deny.iter().find(|r| r.matches(normalized_path))
    }

    pub fn first_allow(&self, normalized_path: &str) -> Option<&Rule> {
        self.allow.iter().find(|r| r.matches(normalized_path))
    }

    pub fn deny_rules(&self) -> &[Rule] {
        &self.deny
    }

    pub fn allow_rules(&self) -> &[Rule] {
        &self.allow
    }
}
