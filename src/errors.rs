use thiserror::Error;

/// Error type shared by the planner, trip, wallet, and persistence layers.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid category index {index} (allocator has {len} categories)")]
    InvalidIndex { index: usize, len: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
