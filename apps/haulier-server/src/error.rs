//! Server error types.

use api_protocol::{error_codes, ErrorResponse};
use auth::AuthError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geocoding::GeocodeError;
use resource_store::StoreError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Bad input shape, enum value or identifier.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique key is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Email/password pair rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated caller may not act on this record.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request exceeded the server-side time limit.
    #[error("Request timed out")]
    Timeout,

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Geocoding error.
    #[error("Geocoding error: {0}")]
    Geocoding(#[from] GeocodeError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the HTTP status and error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::InvalidArgument(_) => {
                (StatusCode::BAD_REQUEST, error_codes::INVALID_ARGUMENT)
            }
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            ServerError::Conflict(_) => (StatusCode::CONFLICT, error_codes::CONFLICT),
            ServerError::AuthenticationRequired | ServerError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED)
            }
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, error_codes::FORBIDDEN),
            ServerError::Timeout => (StatusCode::GATEWAY_TIMEOUT, error_codes::TIMEOUT),
            ServerError::Store(StoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, error_codes::NOT_FOUND)
            }
            ServerError::Store(StoreError::AlreadyExists { .. }) => {
                (StatusCode::CONFLICT, error_codes::CONFLICT)
            }
            ServerError::Auth(
                AuthError::TokenExpired
                | AuthError::InvalidToken
                | AuthError::JwtValidation(_)
                | AuthError::InvalidCredentials,
            ) => (StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED),
            ServerError::Geocoding(GeocodeError::InvalidPlace { .. }) => {
                (StatusCode::BAD_REQUEST, error_codes::INVALID_ARGUMENT)
            }
            ServerError::Store(_)
            | ServerError::Auth(_)
            | ServerError::Geocoding(_)
            | ServerError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }

    /// Message safe to show to the caller.
    fn public_message(&self) -> String {
        match self {
            ServerError::InvalidArgument(msg)
            | ServerError::NotFound(msg)
            | ServerError::Conflict(msg)
            | ServerError::Forbidden(msg) => msg.clone(),
            ServerError::Timeout => "Request timed out".to_string(),
            ServerError::AuthenticationRequired => "Authentication required".to_string(),
            ServerError::InvalidCredentials | ServerError::Auth(AuthError::InvalidCredentials) => {
                "Invalid email or password".to_string()
            }
            ServerError::Auth(AuthError::TokenExpired) => "Token expired".to_string(),
            ServerError::Auth(AuthError::InvalidToken | AuthError::JwtValidation(_)) => {
                "Invalid token".to_string()
            }
            ServerError::Store(e @ (StoreError::NotFound { .. } | StoreError::AlreadyExists { .. })) => {
                e.to_string()
            }
            ServerError::Geocoding(GeocodeError::InvalidPlace { .. }) => {
                "The provided place_id is not valid".to_string()
            }
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = ErrorResponse::new(code, self.public_message());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::InvalidArgument(rejection.body_text())
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_domain_statuses() {
        let not_found = ServerError::from(StoreError::not_found("Order", "x"));
        assert_eq!(not_found.status_and_code().0, StatusCode::NOT_FOUND);

        let conflict = ServerError::from(StoreError::already_exists("User", "a@b.io"));
        assert_eq!(
            conflict.status_and_code(),
            (StatusCode::CONFLICT, error_codes::CONFLICT)
        );

        let corrupt = ServerError::from(StoreError::Corrupt {
            entity_type: "Order",
            reason: "bad status".to_string(),
        });
        assert_eq!(
            corrupt.status_and_code().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = ServerError::Internal("connection refused at 10.0.0.5".to_string());
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);

        let err = ServerError::from(GeocodeError::MissingApiKey);
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_rejected_place_is_invalid_argument() {
        let err = ServerError::from(GeocodeError::InvalidPlace {
            status: "NOT_FOUND".to_string(),
            message: None,
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, error_codes::INVALID_ARGUMENT)
        );
    }

    #[test]
    fn test_timeout_and_forbidden_statuses() {
        assert_eq!(
            ServerError::Timeout.status_and_code(),
            (StatusCode::GATEWAY_TIMEOUT, error_codes::TIMEOUT)
        );
        let err = ServerError::Forbidden("nope".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::FORBIDDEN, error_codes::FORBIDDEN)
        );
        assert_eq!(err.public_message(), "nope");
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        for err in [AuthError::TokenExpired, AuthError::InvalidToken] {
            let err = ServerError::from(err);
            assert_eq!(err.status_and_code().0, StatusCode::UNAUTHORIZED);
        }
        let err = ServerError::from(AuthError::PasswordHash("oom".to_string()));
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
