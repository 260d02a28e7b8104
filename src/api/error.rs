use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Sign in required")]
    MissingToken,

    #[error("Session rejected by the server")]
    Unauthorized,

    /// Signed in, but this account may not use the resource.
    #[error("Not permitted for this account")]
    Forbidden,

    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Expected HTTP {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unreadable response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// True when the right reaction is to send the user to sign in.
    pub fn needs_sign_in(&self) -> bool {
        matches!(self, ApiError::MissingToken | ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Result of one API call. Absence (`NotFound`) is kept apart from failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Ok(T),
    NotFound,
    Failed(ApiError),
}

impl<T> ApiOutcome<T> {
    pub fn into_result(self) -> ApiResult<Option<T>> {
        match self {
            ApiOutcome::Ok(value) => Ok(Some(value)),
            ApiOutcome::NotFound => Ok(None),
            ApiOutcome::Failed(err) => Err(err),
        }
    }

    /// Treat absence as an error, for resources the caller cannot do without.
    pub fn require(self) -> ApiResult<T> {
        match self {
            ApiOutcome::Ok(value) => Ok(value),
            ApiOutcome::NotFound => Err(ApiError::Status {
                status: 404,
                body: "not found".to_string(),
            }),
            ApiOutcome::Failed(err) => Err(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Ok(value) => ApiOutcome::Ok(f(value)),
            ApiOutcome::NotFound => ApiOutcome::NotFound,
            ApiOutcome::Failed(err) => ApiOutcome::Failed(err),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ApiOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ApiOutcome::Ok(_))
    }
}

impl<T> From<ApiResult<T>> for ApiOutcome<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => ApiOutcome::Ok(value),
            Err(err) => ApiOutcome::Failed(err),
        }
    }
}
