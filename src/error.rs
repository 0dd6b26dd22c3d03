use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    BadRequest(String),
    /// Constraint violations of a request body, reported together
    Validation(Vec<String>),
    NotFound(String),
    NameExists(String),
    VersionInvalid(String),
    VersionOutdated(i32),
    PreconditionRequired(String),
    PayloadTooLarge(usize),
    Unauthorized,
    Forbidden,
    NotAcceptable,
    Internal(String),
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::BadRequest(e) => write!(f, "{}", e),
            AppError::Validation(messages) => write!(f, "{}", messages.join("; ")),
            AppError::NotFound(e) => write!(f, "{}", e),
            AppError::NameExists(name) => write!(f, "Der Name {} existiert bereits.", name),
            AppError::VersionInvalid(version) => {
                write!(f, "Die Versionsnummer {} ist ungueltig.", version)
            }
            AppError::VersionOutdated(version) => {
                write!(f, "Die Versionsnummer {} ist nicht aktuell.", version)
            }
            AppError::PreconditionRequired(e) => write!(f, "{}", e),
            AppError::PayloadTooLarge(limit) => {
                write!(f, "Die Datei ist groesser als {} Bytes.", limit)
            }
            AppError::Unauthorized => write!(f, "Authentifizierung erforderlich"),
            AppError::Forbidden => {
                write!(f, "Kein Token mit ausreichender Berechtigung vorhanden")
            }
            AppError::NotAcceptable => write!(f, "Not Acceptable"),
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

/// Error body in the shape `{"statusCode", "message", "error"}`
pub fn error_body(status: StatusCode, message: Value) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
            "error": status.canonical_reason().unwrap_or("Error"),
        })),
    )
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NameExists(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::VersionInvalid(_) | AppError::VersionOutdated(_) => {
                StatusCode::PRECONDITION_FAILED
            }
            AppError::PreconditionRequired(_) => StatusCode::PRECONDITION_REQUIRED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        }
    }

    /// True for errors caused by the client request rather than the server
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    pub fn to_response(&self) -> (StatusCode, Json<Value>) {
        let status = self.status_code();
        let message = match self {
            AppError::Validation(messages) => json!(messages),
            _ if status.is_server_error() => {
                tracing::error!("{}", self);
                json!("Interner Fehler")
            }
            _ => json!(self.to_string()),
        };
        error_body(status, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NameExists("Luna".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::VersionOutdated(1).status_code(),
            StatusCode::PRECONDITION_FAILED
        );
        assert_eq!(
            AppError::PreconditionRequired("x".to_string()).status_code(),
            StatusCode::PRECONDITION_REQUIRED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let (status, Json(body)) = AppError::Database("secret dsn".to_string()).to_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["statusCode"], 500);
        assert!(!body["message"].as_str().unwrap().contains("secret"));
    }

    #[test]
    fn test_validation_message_is_array() {
        let error = AppError::Validation(vec!["a".to_string(), "b".to_string()]);
        let (_, Json(body)) = error.to_response();
        assert_eq!(body["message"], json!(["a", "b"]));
        assert_eq!(body["error"], "Bad Request");
    }
}
