//! Role claim derivation
//!
//! Derives standard role claims from a source claim on an identity and appends
//! them in one batch.
//!
//! # Features
//!
//! - **Delimited text**: `jobTitle = "Engineer, Manager ,  , Lead"` yields three roles
//! - **JSON arrays**: `roles = ["Admin", " Editor "]` yields two roles
//! - **Blank filtering**: empty and whitespace-only candidates never produce claims
//! - **Pooled batching**: claims are staged in a [`ClaimBufferPool`] buffer and
//!   bulk-appended, so each call allocates only for the roles it keeps
//!
//! # Example
//!
//! ```rust
//! use cretoai_claims::derive::RoleClaimDeriver;
//! use cretoai_claims::identity::ClaimsPrincipal;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let deriver = RoleClaimDeriver::default();
//!
//! let mut principal = ClaimsPrincipal::new("Bearer")
//!     .with_claim("jobTitle", "Engineer, Manager ,  , Lead")
//!     .with_claim("roles", r#"["Admin", "", " Editor "]"#);
//!
//! assert_eq!(deriver.add_roles_from_job_title(&mut principal), 3);
//! assert_eq!(deriver.add_roles_from_roles(&mut principal)?, 2);
//!
//! assert!(principal.claims.has_role("Lead"));
//! assert!(principal.claims.has_role("Editor"));
//! # Ok(())
//! # }
//! ```

pub mod delimited;
pub mod json;


pub use delimited::{segment_bound, DelimitedSegments};
pub use json::decode_role_array;

use crate::error::{ClaimsError, Result};
use crate::identity::{ClaimsIdentity, Identity};
use crate::pool::{ClaimBufferPool, PooledBuffer};
use crate::types::{Claim, JOB_TITLE_CLAIM_TYPE, ROLES_CLAIM_TYPE, ROLE_CLAIM_TYPE};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, trace, warn};

static DEFAULT_DERIVER: Lazy<RoleClaimDeriver> = Lazy::new(RoleClaimDeriver::default);

/// Role deriver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriverConfig {
    /// Claim read by the delimited-text form
    pub job_title_claim_type: String,

    /// Claim read by the JSON-array form
    pub roles_claim_type: String,

    /// Claim type given to every derived role
    pub role_claim_type: String,

    /// Segment delimiter for the delimited-text form
    pub delimiter: char,
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            job_title_claim_type: JOB_TITLE_CLAIM_TYPE.to_string(),
            roles_claim_type: ROLES_CLAIM_TYPE.to_string(),
            role_claim_type: ROLE_CLAIM_TYPE.to_string(),
            delimiter: ',',
        }
    }
}

impl DeriverConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let keys = [
            ("job_title_claim_type", &self.job_title_claim_type),
            ("roles_claim_type", &self.roles_claim_type),
            ("role_claim_type", &self.role_claim_type),
        ];

        for (field, value) in keys {
            if value.trim().is_empty() {
                return Err(ClaimsError::InvalidConfig(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }

        Ok(())
    }
}

/// Derives role claims from a source claim and appends them to an identity
///
/// # Thread Safety
///
/// The deriver holds no per-call state and can be shared across threads. The
/// only shared resource is its buffer pool, which synchronizes internally.
/// Calls on the same identity are serialized by the `&mut` borrow.
#[derive(Debug, Clone)]
pub struct RoleClaimDeriver {
    config: DeriverConfig,
    pool: Arc<ClaimBufferPool>,
}

impl RoleClaimDeriver {
    /// Create a deriver backed by the process-wide buffer pool
    pub fn new(config: DeriverConfig) -> Result<Self> {
        Self::with_pool(config, ClaimBufferPool::shared())
    }

    /// Create a deriver backed by a dedicated buffer pool
    pub fn with_pool(config: DeriverConfig, pool: Arc<ClaimBufferPool>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, pool })
    }

    /// Process-wide deriver with default configuration
    pub fn shared() -> &'static RoleClaimDeriver {
        &DEFAULT_DERIVER
    }

    pub fn config(&self) -> &DeriverConfig {
        &self.config
    }

    pub fn pool(&self) -> &Arc<ClaimBufferPool> {
        &self.pool
    }

    /// Derive roles from the comma-separated job title claim
    ///
    /// Returns the number of role claims appended.
    pub fn add_roles_from_job_title<I>(&self, identity: &mut I) -> usize
    where
        I: Identity + ?Sized,
    {
        self.add_roles_from_claim(identity, &self.config.job_title_claim_type)
    }

    /// Derive roles from any delimited-text claim
    ///
    /// Never fails: a missing capability, a missing or blank claim, and a
    /// value made only of delimiters and whitespace all append nothing.
    pub fn add_roles_from_claim<I>(&self, identity: &mut I, claim_type: &str) -> usize
    where
        I: Identity + ?Sized,
    {
        let delimiter = self.config.delimiter;

        let result = self.derive_roles(identity, claim_type, |value, batch| {
            batch.reserve(segment_bound(value, delimiter));
            for segment in DelimitedSegments::new(value, delimiter) {
                batch.push_borrowed(segment);
            }
            Ok::<(), Infallible>(())
        });

        match result {
            Ok(count) => count,
            Err(never) => match never {},
        }
    }

    /// Derive roles from the JSON-encoded roles claim
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::Decode`] if the claim is present but is not a
    /// JSON array of strings. Nothing is appended in that case.
    pub fn add_roles_from_roles<I>(&self, identity: &mut I) -> Result<usize>
    where
        I: Identity + ?Sized,
    {
        self.add_roles_from_json_claim(identity, &self.config.roles_claim_type)
    }

    /// Derive roles from any JSON-array claim
    pub fn add_roles_from_json_claim<I>(&self, identity: &mut I, claim_type: &str) -> Result<usize>
    where
        I: Identity + ?Sized,
    {
        self.derive_roles(identity, claim_type, |value, batch| {
            let roles = match decode_role_array(claim_type, value)? {
                Some(roles) if !roles.is_empty() => roles,
                _ => return Ok(()),
            };

            batch.reserve(roles.len());
            for role in roles.into_iter().flatten() {
                batch.push_owned(role);
            }
            Ok(())
        })
    }

    /// Best-effort variant of [`add_roles_from_roles`](Self::add_roles_from_roles)
    ///
    /// A malformed claim is logged and treated as contributing no roles.
    pub fn add_roles_from_roles_lenient<I>(&self, identity: &mut I) -> usize
    where
        I: Identity + ?Sized,
    {
        match self.add_roles_from_roles(identity) {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed roles claim");
                0
            }
        }
    }

    /// Shared pipeline: capability check, claim lookup, parse into a pooled
    /// batch, bulk-append, release
    fn derive_roles<I, E, F>(
        &self,
        identity: &mut I,
        claim_type: &str,
        parse: F,
    ) -> std::result::Result<usize, E>
    where
        I: Identity + ?Sized,
        F: FnOnce(&str, &mut RoleBatch<'_>) -> std::result::Result<(), E>,
    {
        let Some(claims) = identity.claims_mut() else {
            trace!(claim_type, "Identity carries no claims, skipping role derivation");
            return Ok(0);
        };

        let mut batch = RoleBatch::new(&self.pool, &self.config.role_claim_type);

        match claims.find_first(claim_type) {
            Some(value) if !value.trim().is_empty() => parse(value, &mut batch)?,
            _ => {
                trace!(claim_type, "Source claim absent or blank");
                return Ok(0);
            }
        }

        let mut buffer = match batch.into_buffer() {
            Some(buffer) if !buffer.is_empty() => buffer,
            _ => {
                trace!(claim_type, "No non-blank roles in source claim");
                return Ok(0);
            }
        };

        let count = buffer.len();
        claims.add_claims(buffer.drain(..));

        debug!(claim_type, count, "Appended derived role claims");
        Ok(count)
    }
}

impl Default for RoleClaimDeriver {
    fn default() -> Self {
        Self {
            config: DeriverConfig::default(),
            pool: ClaimBufferPool::shared(),
        }
    }
}

/// Batch of role claims staged in a pooled buffer
///
/// Owns the blank-filtering and trimming rules for every input form. The
/// buffer is checked out on first use and returned when the batch (or the
/// buffer taken from it) is dropped.
pub struct RoleBatch<'p> {
    pool: &'p ClaimBufferPool,
    role_claim_type: &'p str,
    buffer: Option<PooledBuffer<'p>>,
}

impl<'p> RoleBatch<'p> {
    fn new(pool: &'p ClaimBufferPool, role_claim_type: &'p str) -> Self {
        Self {
            pool,
            role_claim_type,
            buffer: None,
        }
    }

    /// Ensure room for `bound` more roles
    pub fn reserve(&mut self, bound: usize) {
        match self.buffer.as_mut() {
            Some(buffer) => buffer.reserve(bound),
            None => self.buffer = Some(self.pool.checkout(bound)),
        }
    }

    /// Trim a borrowed candidate and record it if non-blank
    pub fn push_borrowed(&mut self, candidate: &str) -> bool {
        let role = candidate.trim();
        if role.is_empty() {
            return false;
        }
        self.push_role(role.to_owned());
        true
    }

    /// Trim an owned candidate and record it if non-blank, reusing its
    /// allocation when already trimmed
    pub fn push_owned(&mut self, candidate: String) -> bool {
        match json::trim_owned(candidate) {
            Some(role) => {
                self.push_role(role);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.as_ref().map_or(0, |buffer| buffer.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_role(&mut self, role: String) {
        let pool = self.pool;
        let buffer = self.buffer.get_or_insert_with(|| pool.checkout(1));
        buffer.push(Claim::new(self.role_claim_type, role));
    }

    fn into_buffer(self) -> Option<PooledBuffer<'p>> {
        self.buffer
    }
}

/// Role derivation as methods on any identity, using the shared deriver
pub trait IdentityRolesExt: Identity {
    /// See [`RoleClaimDeriver::add_roles_from_job_title`]
    fn add_roles_from_job_title(&mut self) -> usize {
        RoleClaimDeriver::shared().add_roles_from_job_title(self)
    }

    /// See [`RoleClaimDeriver::add_roles_from_roles`]
    fn add_roles_from_roles(&mut self) -> Result<usize> {
        RoleClaimDeriver::shared().add_roles_from_roles(self)
    }

    /// See [`RoleClaimDeriver::add_roles_from_claim`]
    fn add_roles_from_claim(&mut self, claim_type: &str) -> usize {
        RoleClaimDeriver::shared().add_roles_from_claim(self, claim_type)
    }
}

impl<T: Identity + ?Sized> IdentityRolesExt for T {}
