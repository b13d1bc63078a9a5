//! # CretoAI Claims
//!
//! Claims enrichment for authenticated identities: derives role claims from a
//! job title or a JSON roles claim and appends them to the identity.
//!
//! ## Features
//!
//! - **Delimited text** parsing without intermediate allocations
//! - **JSON role arrays** with typed decode failures
//! - **Pooled claim batches** bulk-appended in a single call
//! - **Capability-based identities**: anything implementing [`Identity`]
//!
//! ## Example
//!
//! ```rust
//! use cretoai_claims::{ClaimsPrincipal, IdentityRolesExt, ROLE_CLAIM_TYPE};
//!
//! let mut principal = ClaimsPrincipal::new("Bearer")
//!     .with_claim("jobTitle", "Engineer, Manager ,  , Lead");
//!
//! let added = principal.add_roles_from_job_title();
//!
//! assert_eq!(added, 3);
//! assert_eq!(principal.claims.find_all(ROLE_CLAIM_TYPE).count(), 3);
//! ```

pub mod types;
pub mod identity;
pub mod pool;
pub mod derive;
pub mod error;

// Re-export commonly used types
pub use types::{Claim, JOB_TITLE_CLAIM_TYPE, ROLES_CLAIM_TYPE, ROLE_CLAIM_TYPE};
pub use identity::{AnonymousIdentity, ClaimSet, ClaimsIdentity, ClaimsPrincipal, Identity};
pub use pool::{ClaimBufferPool, PoolConfig, PoolStats, PooledBuffer};
pub use derive::{DeriverConfig, IdentityRolesExt, RoleClaimDeriver};
pub use error::{ClaimsError, Result};
