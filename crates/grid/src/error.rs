use thiserror::Error;

/// A list load that failed. Stored on the grid next to the stale rows it left in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load rows: {message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(err: &anyhow::Error) -> Self {
        Self {
            message: format!("{err:#}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("{action}: no rows selected")]
    EmptySelection { action: String },
    #[error("{action} failed: {message}")]
    Rejected { action: String, message: String },
}

impl MutationError {
    pub fn rejected(action: &str, err: &anyhow::Error) -> Self {
        Self::Rejected {
            action: action.to_string(),
            message: format!("{err:#}"),
        }
    }

    pub fn action(&self) -> &str {
        match self {
            Self::EmptySelection { action } | Self::Rejected { action, .. } => action,
        }
    }
}
