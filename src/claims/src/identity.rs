//! Identity capability traits and concrete claim stores
//!
//! Derivation only needs two things from an identity: find the first claim of
//! a type, and append a batch of claims. Identities advertise that capability
//! through [`Identity::claims_mut`]; those that return `None` are skipped.

use crate::types::{Claim, ROLE_CLAIM_TYPE};
use serde::{Deserialize, Serialize};
use std::vec::Drain;

/// Claims-bearing capability
pub trait ClaimsIdentity {
    /// Value of the first claim with the given type
    fn find_first(&self, claim_type: &str) -> Option<&str>;

    /// Append a batch of claims in order, taking ownership of each
    fn add_claims(&mut self, claims: Drain<'_, Claim>);
}

/// An authenticated identity
pub trait Identity {
    /// Authentication scheme (e.g., "Bearer"), if known
    fn authentication_type(&self) -> Option<&str> {
        None
    }

    /// Claims capability, or `None` if this identity does not carry claims
    fn claims_mut(&mut self) -> Option<&mut dyn ClaimsIdentity> {
        None
    }
}

/// A missing identity carries no claims
impl<T: Identity> Identity for Option<T> {
    fn authentication_type(&self) -> Option<&str> {
        self.as_ref().and_then(Identity::authentication_type)
    }

    fn claims_mut(&mut self) -> Option<&mut dyn ClaimsIdentity> {
        self.as_mut().and_then(Identity::claims_mut)
    }
}

impl<T: Identity + ?Sized> Identity for Box<T> {
    fn authentication_type(&self) -> Option<&str> {
        (**self).authentication_type()
    }

    fn claims_mut(&mut self) -> Option<&mut dyn ClaimsIdentity> {
        (**self).claims_mut()
    }
}

/// Ordered multiset of claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single claim
    pub fn push(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Builder-style append
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Claim::new(claim_type, value));
        self
    }

    /// All claims with the given type, in insertion order
    pub fn find_all<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a Claim> + 'a {
        self.claims.iter().filter(move |claim| claim.is_type(claim_type))
    }

    /// Values of every standard role claim
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.find_all(ROLE_CLAIM_TYPE).map(Claim::value)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().any(|r| r == role)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Claim> {
        self.claims.iter()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl ClaimsIdentity for ClaimSet {
    fn find_first(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|claim| claim.is_type(claim_type))
            .map(Claim::value)
    }

    fn add_claims(&mut self, claims: Drain<'_, Claim>) {
        self.claims.extend(claims);
    }
}

impl Identity for ClaimSet {
    fn claims_mut(&mut self) -> Option<&mut dyn ClaimsIdentity> {
        Some(self)
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        Self {
            claims: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

/// Authenticated identity backed by a [`ClaimSet`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsPrincipal {
    /// Authentication scheme (e.g., "Bearer", "Cookies")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,

    /// Claims issued to this principal
    #[serde(default)]
    pub claims: ClaimSet,
}

impl ClaimsPrincipal {
    /// Create a principal authenticated with the given scheme
    pub fn new(authentication_type: impl Into<String>) -> Self {
        Self {
            authentication_type: Some(authentication_type.into()),
            claims: ClaimSet::new(),
        }
    }

    /// Add a claim to the principal
    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication_type.is_some()
    }
}

impl Identity for ClaimsPrincipal {
    fn authentication_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    fn claims_mut(&mut self) -> Option<&mut dyn ClaimsIdentity> {
        Some(&mut self.claims)
    }
}

/// Identity with no claims capability (e.g., a bare name-only identity)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymousIdentity {
    pub name: Option<String>,
}

impl Identity for AnonymousIdentity {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_returns_first_match() {
        let set = ClaimSet::new()
            .with_claim("jobTitle", "Engineer")
            .with_claim("jobTitle", "Manager");

        assert_eq!(set.find_first("jobTitle"), Some("Engineer"));
        assert_eq!(set.find_first("roles"), None);
        assert_eq!(set.find_all("jobTitle").count(), 2);
    }

    #[test]
    fn test_add_claims_preserves_order() {
        let mut set = ClaimSet::new().with_claim("sub", "alice");
        let mut batch = vec![Claim::role("Admin"), Claim::role("Editor")];

        set.add_claims(batch.drain(..));

        assert!(batch.is_empty());
        assert_eq!(set.len(), 3);
        assert_eq!(set.roles().collect::<Vec<_>>(), vec!["Admin", "Editor"]);
        assert!(set.has_role("Editor"));
    }

    #[test]
    fn test_capability_dispatch() {
        let mut principal = ClaimsPrincipal::new("Bearer").with_claim("jobTitle", "Lead");
        assert!(principal.is_authenticated());
        assert_eq!(principal.authentication_type(), Some("Bearer"));
        assert!(principal.claims_mut().is_some());

        let mut anonymous = AnonymousIdentity::default();
        assert!(anonymous.claims_mut().is_none());

        let mut missing: Option<ClaimsPrincipal> = None;
        assert!(missing.claims_mut().is_none());

        let mut boxed: Box<dyn Identity> = Box::new(ClaimSet::new());
        assert!(boxed.claims_mut().is_some());
    }

    #[test]
    fn test_principal_deserialization() {
        let principal: ClaimsPrincipal = serde_json::from_str(
            r#"{"authentication_type":"Bearer","claims":[{"type":"roles","value":"[]"}]}"#,
        )
        .unwrap();

        assert_eq!(principal.claims.find_first("roles"), Some("[]"));
    }
}
