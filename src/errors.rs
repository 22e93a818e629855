use std::collections::BTreeMap;

use axum::{http::StatusCode, response::IntoResponse, Json};
use validator::ValidationErrors;

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    Validation(ValidationErrors),
    BadRequest(&'static str),
    NotAuthorized(&'static str),
    Forbidden(&'static str),
    NotFound(&'static str),
    Conflict(&'static str),
    ServerError,
    DatabaseError(sqlx::Error),
}

/// Flat error body used for everything except validation failures.
#[derive(Debug, serde::Serialize)]
pub struct RequestErrorJson {
    error: String,
}

/// Field-level validation errors: `{"errors": {"bio": ["..."]}}`.
#[derive(Debug, serde::Serialize)]
pub struct ValidationErrorJson {
    errors: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Flat(RequestErrorJson),
    Fields(ValidationErrorJson),
}

impl RequestErrorJson {
    pub fn new(error: &str) -> RequestErrorJson {
        RequestErrorJson {
            error: error.to_string(),
        }
    }
}

impl ValidationErrorJson {
    pub fn new(errors: &ValidationErrors) -> ValidationErrorJson {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors.iter().map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => error.code.to_string(),
            });
            fields.entry(field.to_string()).or_default().extend(messages);
        }
        ValidationErrorJson { errors: fields }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl From<ValidationErrors> for RequestError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    /// True when the error is a storage-level uniqueness violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            RequestError::DatabaseError(sqlx::Error::Database(e)) => {
                e.message().contains("UNIQUE constraint failed")
            }
            _ => false,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Validation(_) | RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RequestError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden(_) => StatusCode::FORBIDDEN,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::Conflict(_) => StatusCode::CONFLICT,
            RequestError::ServerError | RequestError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<ErrorBody> {
        let body = match self {
            RequestError::Validation(errors) => ErrorBody::Fields(ValidationErrorJson::new(errors)),
            RequestError::BadRequest(message)
            | RequestError::NotAuthorized(message)
            | RequestError::Forbidden(message)
            | RequestError::NotFound(message)
            | RequestError::Conflict(message) => ErrorBody::Flat(RequestErrorJson::new(message)),
            RequestError::ServerError => {
                ErrorBody::Flat(RequestErrorJson::new("Internal Server Error"))
            }
            RequestError::DatabaseError(e) => {
                log::error!("Database error: {}", e);
                ErrorBody::Flat(RequestErrorJson::new("Internal Server Error"))
            }
        };
        (self.status_code(), Json(body))
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use validator::ValidationError;

    use super::*;

    #[test]
    fn flat_errors_carry_a_single_message() {
        let (status, Json(body)) = RequestError::Forbidden("Forbidden").to_json_response();
        assert_eq!(status, StatusCode::FORBIDDEN);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Forbidden" }));
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let error = RequestError::DatabaseError(sqlx::Error::RowNotFound);
        let (status, Json(body)) = error.to_json_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Internal Server Error" }));
    }

    #[test]
    fn validation_errors_are_grouped_by_field() {
        let mut errors = ValidationErrors::new();
        let mut bio = ValidationError::new("length");
        bio.message = Some(Cow::from("Bio must be at most 500 characters"));
        errors.add("bio", bio);
        errors.add("image", ValidationError::new("url"));

        let (status, Json(body)) = RequestError::from(errors).to_json_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "errors": {
                    "bio": ["Bio must be at most 500 characters"],
                    "image": ["url"]
                }
            })
        );
    }
}
