use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use storage::services::goal_progress::GoalError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    Goal(GoalError),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    #[allow(dead_code)]
    NotFound,
    #[allow(dead_code)]
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Goal(e) => write!(f, "Goal error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::NotFound => write!(f, "Resource not found"),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Goal(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(StorageError::NotFound) | Self::NotFound => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                json!({
                    "error": "Validation failed",
                    "details": validation_details(errors)
                })
            }
            Self::Goal(e) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
            Self::Forbidden => {
                json!({
                    "error": "You do not have permission to perform this action"
                })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({
                    "error": "An internal error occurred"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

// Nested DTO errors (e.g. `target_metric.target_value`) are flattened with a
// dotted path.
fn validation_details(errors: &ValidationErrors) -> Vec<String> {
    let mut details = Vec::new();
    collect_validation_details(errors, "", &mut details);
    details
}

fn collect_validation_details(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| {
                    format!(
                        "{}: {}",
                        path,
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    )
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validation_details(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_details(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<GoalError> for WebError {
    fn from(error: GoalError) -> Self {
        Self::Goal(error)
    }
}

pub type ApiResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
        rating: u8,
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WebError::Storage(StorageError::NotFound), StatusCode::NOT_FOUND),
            (
                WebError::Storage(StorageError::ConstraintViolation("goal".into())),
                StatusCode::CONFLICT,
            ),
            (WebError::Goal(GoalError::NonPositiveTarget), StatusCode::BAD_REQUEST),
            (WebError::Goal(GoalError::CompletedGoalLocked), StatusCode::BAD_REQUEST),
            (WebError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (WebError::Unauthorized, StatusCode::UNAUTHORIZED),
            (WebError::Forbidden, StatusCode::FORBIDDEN),
            (WebError::NotFound, StatusCode::NOT_FOUND),
            (
                WebError::InternalServerError("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_validation_details_use_message() {
        let errors = Payload { rating: 9 }.validate().unwrap_err();
        let details = validation_details(&errors);
        assert_eq!(details, vec!["rating: Rating must be between 1 and 5"]);

        let response = WebError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
