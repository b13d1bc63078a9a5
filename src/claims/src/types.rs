//! Core claim types

use serde::{Deserialize, Serialize};

/// Standard role claim type, attached to every derived role
pub const ROLE_CLAIM_TYPE: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Free-text, comma-separated job title claim
pub const JOB_TITLE_CLAIM_TYPE: &str = "jobTitle";

/// JSON-encoded role array claim
pub const ROLES_CLAIM_TYPE: &str = "roles";

/// Claim attached to an authenticated identity
///
/// Claims are immutable once built; ownership moves into the identity's
/// claim collection when appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type key (e.g., "jobTitle", [`ROLE_CLAIM_TYPE`])
    #[serde(rename = "type")]
    claim_type: String,

    /// Claim value
    value: String,
}

impl Claim {
    /// Create a new claim
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }

    /// Create a role claim with the standard role claim type
    pub fn role(value: impl Into<String>) -> Self {
        Self::new(ROLE_CLAIM_TYPE, value)
    }

    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check whether this claim has the given type
    pub fn is_type(&self, claim_type: &str) -> bool {
        self.claim_type == claim_type
    }

    /// Decompose into (type, value)
    pub fn into_parts(self) -> (String, String) {
        (self.claim_type, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_creation() {
        let claim = Claim::new("jobTitle", "Engineer, Lead");

        assert_eq!(claim.claim_type(), "jobTitle");
        assert_eq!(claim.value(), "Engineer, Lead");
        assert!(claim.is_type(JOB_TITLE_CLAIM_TYPE));
        assert!(!claim.is_type(ROLES_CLAIM_TYPE));
    }

    #[test]
    fn test_role_claim() {
        let claim = Claim::role("Admin");
        assert_eq!(claim.claim_type(), ROLE_CLAIM_TYPE);
        assert_eq!(claim.into_parts(), (ROLE_CLAIM_TYPE.to_string(), "Admin".to_string()));
    }

    #[test]
    fn test_claim_serialization() {
        let claim = Claim::new("roles", "[\"Admin\"]");
        let json = serde_json::to_value(&claim).unwrap();

        assert_eq!(json["type"], "roles");
        assert_eq!(json["value"], "[\"Admin\"]");

        let back: Claim = serde_json::from_value(json).unwrap();
        assert_eq!(back, claim);
    }
}
