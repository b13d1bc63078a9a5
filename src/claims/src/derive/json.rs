//! JSON role-array decoding

use crate::error::{ClaimsError, Result};

/// Decode a claim value as a JSON array of role names
///
/// `null` decodes to `None` (claim treated as absent). Null elements are kept
/// as `None` and skipped by the caller. Any other non-array shape is a
/// [`ClaimsError::Decode`].
pub fn decode_role_array(claim_type: &str, value: &str) -> Result<Option<Vec<Option<String>>>> {
    serde_json::from_str(value).map_err(|e| ClaimsError::decode(claim_type, e))
}

/// Trim an owned role name, reusing the original allocation when there is
/// nothing to trim
///
/// Returns `None` for empty or whitespace-only input.
pub fn trim_owned(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() == value.len() {
        return Some(value);
    }
    Some(trimmed.to_owned())
}
