use grid::MutationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    /// Form values that cannot become a request payload. Nothing was sent.
    #[error("invalid form values: {0}")]
    Validation(String),
    #[error("{page}: no row with id {id} on the current page")]
    MissingRow { page: String, id: String },
    #[error("{page} does not support {action}")]
    Unsupported { page: String, action: &'static str },
    #[error(transparent)]
    Mutation(#[from] MutationError),
}
