use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Key material could not be decoded as PEM or DER
    #[error("Key parse error: {0}")]
    KeyParse(String),

    /// The signing primitive failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// A signature did not verify against the content
    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),

    /// JSON serialization/deserialization errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The vendor answered with a non-success business code
    #[error("Remote error {code}: {msg} ({sub_msg})")]
    Remote {
        code: String,
        msg: String,
        sub_msg: String,
    },

    /// Transport failure reaching the vendor
    #[error("Network error: {0}")]
    Network(#[from] reqwest_middleware::Error),

    /// Vendor trade status with no local counterpart
    #[error("Unknown trade status: {0}")]
    UnknownStatus(String),

    /// No constructor registered for the requested channel
    #[error("Channel not registered: {0}")]
    UnregisteredChannel(String),

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.into())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::SignatureMismatch(_) => StatusCode::BAD_REQUEST,
            AppError::Remote { .. } | AppError::Network(_) | AppError::UnknownStatus(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::KeyParse(_)
            | AppError::Signing(_)
            | AppError::Encoding(_)
            | AppError::UnregisteredChannel(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn key_parse(msg: impl Into<String>) -> Self {
        AppError::KeyParse(msg.into())
    }

    pub fn signature_mismatch(msg: impl Into<String>) -> Self {
        AppError::SignatureMismatch(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// True for errors that mean "this callback must be rejected" rather than a
    /// fault on our side.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::SignatureMismatch(_) | AppError::Validation(_)
        )
    }
}
