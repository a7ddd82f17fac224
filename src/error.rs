use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned when no application token can be obtained
pub const TOKEN_UNAVAILABLE_MESSAGE: &str =
    "No se pudo obtener el token de Twitch. Intente reiniciar el servidor.";
/// Message returned when the stream listing fails upstream
pub const STREAMS_FAILED_MESSAGE: &str = "Fallo interno al obtener streams de Twitch.";
/// Message returned when the authorization code exchange fails upstream
pub const EXCHANGE_FAILED_MESSAGE: &str = "Fallo en la autenticación con Twitch.";
/// Message returned when the callback is called without a code
pub const MISSING_CODE_MESSAGE: &str = "No se encontró el código de autorización.";
/// Message returned to origins outside the allow-list
pub const ORIGIN_REJECTED_MESSAGE: &str = "No permitido por CORS";

/// Main error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    /// Token acquisition against the identity provider failed
    #[error("Twitch authentication failed: {message}")]
    Auth {
        message: String,
        /// Raw error payload returned by the provider, if any
        payload: Option<String>,
    },

    /// No usable application token at request time
    #[error("No Twitch application token available")]
    ServiceUnavailable,

    /// Missing required input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A downstream call failed after the token was presumed valid
    #[error("{message}: {detail}")]
    Upstream {
        /// User-facing message for the response body
        message: &'static str,
        detail: String,
    },

    /// Browser origin outside the allow-list
    #[error("Origin '{0}' not allowed by CORS")]
    OriginRejected(String),
}

/// Type alias for relay results
pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// Create an auth error from a transport or decoding failure
    pub fn auth(message: impl Into<String>) -> Self {
        RelayError::Auth {
            message: message.into(),
            payload: None,
        }
    }

    /// Create an upstream error with the given user-facing message
    pub fn upstream(message: &'static str, detail: impl fmt::Display) -> Self {
        RelayError::Upstream {
            message,
            detail: detail.to_string(),
        }
    }

    /// Error code for logs
    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::Auth { .. } => ErrorCode::AuthorizationFailed,
            RelayError::ServiceUnavailable => ErrorCode::AuthTokenUnavailable,
            RelayError::BadRequest(_) => ErrorCode::BadRequest,
            RelayError::Upstream { .. } => ErrorCode::ApiRequestFailed,
            RelayError::OriginRejected(_) => ErrorCode::OriginRejected,
        }
    }

    /// HTTP status the error maps to at the boundary
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::OriginRejected(_) => StatusCode::FORBIDDEN,
            RelayError::Auth { .. } | RelayError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand back to the browser
    pub fn public_message(&self) -> String {
        match self {
            RelayError::Auth { .. } => EXCHANGE_FAILED_MESSAGE.to_string(),
            RelayError::ServiceUnavailable => TOKEN_UNAVAILABLE_MESSAGE.to_string(),
            RelayError::BadRequest(message) => message.clone(),
            RelayError::Upstream { message, .. } => message.to_string(),
            RelayError::OriginRejected(_) => ORIGIN_REJECTED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Enumeration of error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AuthorizationFailed,
    AuthTokenUnavailable,
    BadRequest,
    ApiRequestFailed,
    OriginRejected,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code_str = match self {
            ErrorCode::AuthorizationFailed => "AUTH_FAILED",
            ErrorCode::AuthTokenUnavailable => "AUTH_TOKEN_UNAVAILABLE",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::ApiRequestFailed => "API_REQUEST_FAILED",
            ErrorCode::OriginRejected => "CORS_ORIGIN_REJECTED",
        };
        write!(f, "{}", code_str)
    }
}
