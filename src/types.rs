/// Serializable error envelope written to stderr.
///
/// Decoupled from `RpaasError` so the JSON shape stays stable when error
/// variants change.
use serde::{Deserialize, Serialize};

use crate::errors::RpaasError;

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status of a failed API call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Message from the API's error body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorOutput {
    /// Construct from an `RpaasError`.
    #[must_use]
    pub fn from_error(err: &RpaasError) -> Self {
        use crate::rpaas::ClientError;

        let code = match err {
            RpaasError::Validation(_) => "invalid_argument",
            RpaasError::Config(_) => "config_error",
            RpaasError::Client(_) => "client_error",
            RpaasError::Upstream { .. } => "upstream_error",
            RpaasError::Output(_) | RpaasError::Serialization(_) => "output_error",
        };

        let (status, detail) = match err {
            RpaasError::Upstream { source, .. } => {
                let detail = match source {
                    ClientError::Status { message, .. } => message.clone(),
                    _ => None,
                };
                (source.status().map(|status| status.as_u16()), detail)
            }
            _ => (None, None),
        };

        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message: err.to_string(),
                status,
                detail,
            },
        }
    }
}
