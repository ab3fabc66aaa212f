//! Core domain errors.

use thiserror::Error;

/// Core domain errors for ConsultIA.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Expert id not present in the catalog.
    #[error("Expert not found: {0}")]
    ExpertNotFound(String),

    /// Goal not found.
    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    /// Unknown category, status or role name.
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
