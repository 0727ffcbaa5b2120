/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A platform record projected down to its identifier and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformResource {
    pub id: String,
    pub name: String,
}

/// Display-only user profile from the identity provider's account endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<String>,
    pub username: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub raw: Value,
}

impl UserProfile {
    pub fn from_raw(raw: Value) -> Self {
        let field = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            id: field("id").or_else(|| field("user_id")),
            username: field("username").or_else(|| field("user_name")),
            display_name: field("name"),
            email: field("email"),
            raw,
        }
    }
}

/// Per-session tenant authorization context.
///
/// `organization_ids` and `organization_names` are index aligned in the order
/// the platform returned them; the same holds for the space lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    pub organization_ids: Vec<String>,
    pub organization_names: Vec<String>,
    pub space_ids: Vec<String>,
    pub space_names: Vec<String>,
    pub profile: UserProfile,
}

impl AuthorizationContext {
    pub fn new(
        profile: UserProfile,
        organizations: Vec<PlatformResource>,
        spaces: Vec<PlatformResource>,
    ) -> Self {
        let (organization_ids, organization_names) =
            organizations.into_iter().map(|r| (r.id, r.name)).unzip();
        let (space_ids, space_names) = spaces.into_iter().map(|r| (r.id, r.name)).unzip();
        Self {
            organization_ids,
            organization_names,
            space_ids,
            space_names,
            profile,
        }
    }

    /// Membership check by organization name
    pub fn is_member_of(&self, organization_name: &str) -> bool {
        self.organization_names.iter().any(|n| n == organization_name)
    }
}
