//! Unified error types for the Fireside core.
//!
//! Provides user-friendly, actionable error messages that wrap
//! the underlying document store errors.

/// Result type alias for Fireside operations.
pub type Result<T> = std::result::Result<T, FiresideError>;

/// Unified error type for the Fireside core.
///
/// Authorization decisions are not errors: the policy engine reports them
/// as [`ViewDecision`](crate::policy::ViewDecision) /
/// [`PostGate`](crate::policy::PostGate) values and the filter pipeline
/// renders them as empty results. This type covers the failures that remain.
#[derive(Debug, thiserror::Error)]
pub enum FiresideError {
    // ============================================================
    // User-facing errors (actionable)
    // ============================================================
    /// The specified user was not found.
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    /// The specified adventure was not found.
    #[error("Adventure not found: {id}")]
    AdventureNotFound { id: String },

    /// The specified post was not found.
    #[error("Post not found: {id}")]
    PostNotFound { id: String },

    /// Invalid operation for the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    // ============================================================
    // Wrapped infrastructure errors
    // ============================================================
    /// Document store / transport layer error.
    #[error("Document store error: {0}")]
    Store(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FiresideError {
    fn from(e: serde_json::Error) -> Self {
        FiresideError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FiresideError::UserNotFound {
            id: "u_42".to_string(),
        };
        assert!(err.to_string().contains("u_42"));

        let err = FiresideError::Store("connection reset".to_string());
        assert!(err.to_string().contains("connection reset"));
    }
}
