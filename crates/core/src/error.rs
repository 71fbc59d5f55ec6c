use crate::types::DbId;
use crate::validation::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Every violated field rule, collected in one pass.
    #[error("Validation failed: {} field error(s)", .0.len())]
    FieldViolations(Vec<FieldViolation>),

    /// The change would break a uniqueness rule.
    #[error("Conflict: {0}")]
    Conflict(String),
}
