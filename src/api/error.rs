//! Error types for the backend HTTP client.

use thiserror::Error;

/// Coarse classification of an HTTP failure status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400 / 422: the backend rejected the payload (validation, unknown model or mode).
    BadRequest,
    /// 401 / 403: missing or revoked provider credentials.
    Unauthorized,
    /// 404
    NotFound,
    /// 429: provider quota exhausted.
    RateLimited,
    /// 5xx
    Server,
    Other,
}

/// Map a status code to its [`ApiErrorKind`].
pub fn classify_http_status(status: u16) -> ApiErrorKind {
    match status {
        400 | 422 => ApiErrorKind::BadRequest,
        401 | 403 => ApiErrorKind::Unauthorized,
        404 => ApiErrorKind::NotFound,
        429 => ApiErrorKind::RateLimited,
        500..=599 => ApiErrorKind::Server,
        _ => ApiErrorKind::Other,
    }
}

/// Errors returned by [`crate::api::PlaygroundApi`] implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is what the user gets to see.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ApiErrorKind> {
        self.status().map(classify_http_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_http_status() {
        assert_eq!(classify_http_status(400), ApiErrorKind::BadRequest);
        assert_eq!(classify_http_status(422), ApiErrorKind::BadRequest);
        assert_eq!(classify_http_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(classify_http_status(429), ApiErrorKind::RateLimited);
        assert_eq!(classify_http_status(503), ApiErrorKind::Server);
        assert_eq!(classify_http_status(302), ApiErrorKind::Other);
    }

    #[test]
    fn test_status_error_displays_message() {
        let err = ApiError::Status {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(err.kind(), Some(ApiErrorKind::RateLimited));
    }
}
