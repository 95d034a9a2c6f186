//! Data source error types

/// Errors reported by a [`DataSource`](crate::source::DataSource).
///
/// The controller never retries; these propagate to the caller unchanged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The source failed to execute the query.
    #[error("Query failed: {message}")]
    Failed { message: String },

    /// The variables could not be interpreted by the source.
    #[error("Invalid variable '{name}': {message}")]
    InvalidVariable { name: String, message: String },
}

impl SourceError {
    /// Creates a new query failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Creates a new invalid variable error.
    pub fn invalid_variable(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVariable {
            name: name.into(),
            message: message.into(),
        }
    }
}
