/// Errors from the RPaaS HTTP client layer.
use reqwest::StatusCode;
use thiserror::Error;

/// Typed errors from talking to the RPaaS API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configured base URL could not be parsed or extended.
    #[error("invalid RPaaS API address '{0}'")]
    InvalidUrl(String),

    /// Tsuru proxy mode needs the service name to build the proxy route.
    #[error("service name is required when talking to RPaaS through Tsuru (use --service)")]
    MissingService,

    /// The underlying HTTP client could not be built.
    #[error("could not build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Connection, TLS or timeout failure.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    ///
    /// Displays the canonical status line (`404 Not Found`); the API's own
    /// message is kept for structured output and logs.
    #[error("{status}")]
    Status {
        /// HTTP status of the response.
        status: StatusCode,
        /// `Msg` of the error body, when present.
        message: Option<String>,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Copying a streamed body to the output failed.
    #[error("log stream interrupted: {0}")]
    Stream(#[source] std::io::Error),
}

impl ClientError {
    /// HTTP status of the failed response, if the API answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ClientError::Status {
            status: StatusCode::NOT_FOUND,
            message: Some("instance \"my-instance\" not found".to_owned()),
        };
        assert_eq!(err.to_string(), "404 Not Found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_missing_service_has_no_status() {
        assert_eq!(ClientError::MissingService.status(), None);
    }
}
