use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single API round-trip.
///
/// Every variant renders as a human-readable message; the UI shows it as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to call {call}: {source}")]
    Transport {
        call: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Unauthorized(String),
    /// Non-success status; renders as `<code> <reason>: <body>`.
    #[error("{status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Failed to parse {call} response: {source}")]
    Decode {
        call: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reads_like_a_status_line() {
        let err = ApiError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: r#"{"detail":"Empty name"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"422 Unprocessable Entity: {"detail":"Empty name"}"#
        );
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    }
}
