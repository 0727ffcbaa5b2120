use crate::types::AuthorizationContext;

/// Decides whether a session's queries need tenant scoping at all.
///
/// Members of the system organization, and every session when authorization
/// is switched off, see unscoped results. This is the operator escape hatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePolicy {
    pub system_org: String,
    pub skip_authorization: bool,
}

impl ScopePolicy {
    pub fn new(system_org: impl Into<String>, skip_authorization: bool) -> Self {
        Self {
            system_org: system_org.into(),
            skip_authorization,
        }
    }

    pub fn requires_scoping(&self, context: &AuthorizationContext) -> bool {
        if self.skip_authorization {
            return false;
        }
        !context.is_member_of(&self.system_org)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlatformResource;

    fn member_of(orgs: &[&str]) -> AuthorizationContext {
        let orgs = orgs
            .iter()
            .enumerate()
            .map(|(i, name)| PlatformResource { id: format!("org-{i}"), name: name.to_string() })
            .collect();
        AuthorizationContext::new(Default::default(), orgs, vec![])
    }

    #[test]
    fn regular_tenant_is_scoped() {
        let policy = ScopePolicy::new("system", false);
        assert!(policy.requires_scoping(&member_of(&["acme"])));
        assert!(policy.requires_scoping(&member_of(&[])));
    }

    #[test]
    fn system_org_member_bypasses_scoping() {
        let policy = ScopePolicy::new("system", false);
        assert!(!policy.requires_scoping(&member_of(&["acme", "system"])));
    }

    #[test]
    fn skip_authorization_bypasses_scoping() {
        let policy = ScopePolicy::new("system", true);
        assert!(!policy.requires_scoping(&member_of(&["acme"])));
    }

    #[test]
    fn system_org_matches_by_name_not_id() {
        let policy = ScopePolicy::new("org-0", false);
        assert!(policy.requires_scoping(&member_of(&["acme"])));
    }
}
