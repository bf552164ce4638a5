use reqwest::StatusCode;
use shared::error::{ApiException, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid admin api url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error(transparent)]
    Api(#[from] ApiException),
}

impl ClientError {
    /// True when the server rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Status { status, .. } => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            Self::Api(err) => matches!(err.kind(), ErrorCode::Unauthorized | ErrorCode::Forbidden),
            _ => false,
        }
    }
}
