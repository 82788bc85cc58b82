//! Client error taxonomy.

use medox_task::PollError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 429. Surfaced distinctly so callers can tell the user to slow
    /// down instead of showing a generic failure.
    #[error("rate limited by the server, try again later")]
    RateLimited,
    /// HTTP 404 — unknown drug/disease name or task id.
    #[error("not found: {0}")]
    NotFound(String),
    /// HTTP 401/403 — missing, stale or revoked API key.
    #[error("unauthorized: the API key was rejected")]
    Unauthorized,
    /// Rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Any other non-2xx response.
    #[error("server returned {status}: {detail}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        detail: String,
    },
    /// 2xx but not the JSON we asked for.
    #[error("unexpected response format: expected JSON, got {0}")]
    UnexpectedContentType(String),
    /// 2xx JSON that does not carry the fields the protocol promises.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    /// The polling loop was cancelled before the task finished.
    #[error("operation cancelled")]
    Cancelled,
    /// The polling loop hit its attempt ceiling.
    #[error("task not finished after {attempts} status checks")]
    TaskTimedOut { attempts: u32 },
}

impl From<PollError<ApiError>> for ApiError {
    fn from(err: PollError<ApiError>) -> Self {
        match err {
            PollError::Cancelled => ApiError::Cancelled,
            PollError::Exhausted { attempts } => ApiError::TaskTimedOut { attempts },
            PollError::Probe(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
