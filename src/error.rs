//! Error types
//!
//! The simulation itself never fails once constructed: out-of-precondition
//! input is ignored and falling off the screen is an ordinary outcome. Errors
//! only arise from bad configuration and from record storage.

/// Configuration rejected at construction time
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Record/settings storage failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = SimError::invalid("initial_count", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid configuration for `initial_count`: must be at least 1"
        );
    }
}
