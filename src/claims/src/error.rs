//! Error types for role claim derivation

use thiserror::Error;

/// Claims enrichment errors
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// Source claim present but not a JSON array of strings
    #[error("Failed to decode '{claim_type}' claim as a role array: {source}")]
    Decode {
        /// Claim type whose value failed to decode
        claim_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid deriver configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClaimsError {
    /// Build a decode failure for the given claim type
    pub(crate) fn decode(claim_type: &str, source: serde_json::Error) -> Self {
        Self::Decode {
            claim_type: claim_type.to_string(),
            source,
        }
    }

    /// Whether this error came from a malformed source claim
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Result type for claims operations
pub type Result<T> = std::result::Result<T, ClaimsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message() {
        let source = serde_json::from_str::<Vec<String>>("{}").unwrap_err();
        let err = ClaimsError::decode("roles", source);

        assert!(err.is_decode());
        assert!(err.to_string().starts_with("Failed to decode 'roles' claim"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_is_not_decode() {
        let err = ClaimsError::InvalidConfig("empty delimiter".to_string());
        assert!(!err.is_decode());
        assert_eq!(err.to_string(), "Invalid configuration: empty delimiter");
    }
}
