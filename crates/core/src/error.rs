/// Domain error taxonomy shared by every crate in the workspace.
///
/// The HTTP layer maps each variant to a distinct status so operators can tell
/// user input problems, access denials, infrastructure hiccups and deployment
/// mistakes apart.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Network, storage or mail infrastructure failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Required environment configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing dog record.
    pub fn dog_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "Dog",
            id: id.to_string(),
        }
    }
}
