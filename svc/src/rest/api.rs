use actix_web::{error::JsonPayloadError, http::StatusCode, web::JsonConfig, HttpRequest, HttpResponse, ResponseError};
use libsvc::{domain::account::logic::AccountLogicError, foundation::validation::Violations};
use serde::Serialize;
use strum_macros::Display;

/// Upper bound for request bodies.
pub const MAX_BODY_SIZE_BYTES: usize = 16 * 1024;

/// Body of every error response. `violations` is only present when the
/// request failed validation.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Violations>,
}

#[derive(Debug, Display)]
pub enum ApiError {
    #[strum(to_string = "not found")]
    NotFound,
    #[strum(to_string = "invalid request")]
    InvalidRequest(String),
    #[strum(to_string = "validation failed")]
    Validation(Violations),
    #[strum(to_string = "internal server error")]
    Other(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            // Logged by the handler, together with the violation count.
            ApiError::Validation(_) => {}
            _ if status.is_server_error() => {
                tracing::error!(error = ?self, status_code = %status, "Server error");
            }
            _ => tracing::warn!(error = %self, status_code = %status, "Client error"),
        }

        let body = match self {
            ApiError::InvalidRequest(err) => ErrorResponse {
                error: err.clone(),
                violations: None,
            },
            ApiError::Validation(violations) => ErrorResponse {
                error: self.to_string(),
                violations: Some(violations.clone()),
            },
            ApiError::Other(err) => ErrorResponse {
                error: err.clone(),
                violations: None,
            },
            ApiError::NotFound => ErrorResponse {
                error: self.to_string(),
                violations: None,
            },
        };

        HttpResponse::build(status).json(body)
    }
}

impl From<Violations> for ApiError {
    fn from(value: Violations) -> Self {
        ApiError::Validation(value)
    }
}

impl From<AccountLogicError> for ApiError {
    fn from(value: AccountLogicError) -> Self {
        match value {
            AccountLogicError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Turns every JSON extraction failure into a 400 with an `ErrorResponse`.
pub fn json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(MAX_BODY_SIZE_BYTES)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match err {
        JsonPayloadError::ContentType => {
            "invalid JSON payload: expected content type application/json".to_string()
        }
        err => format!("invalid JSON payload: {}", err),
    };
    ApiError::InvalidRequest(message).into()
}

pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}
