use std::borrow::Cow;

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query,
    },
    http::{request::Parts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::RequestError;

fn field_error(
    field: &'static str,
    code: &'static str,
    message: impl Into<Cow<'static, str>>,
) -> ValidationErrors {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

/// Parses a path id, which must be a positive integer.
pub fn parse_id(field: &'static str, raw: &str) -> Result<i64, RequestError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RequestError::Validation(field_error(
            field,
            "positive_integer",
            format!("{} must be a positive integer", field),
        ))),
    }
}

/// Trims a search term and rejects it when nothing is left.
pub fn require_search_term(field: &'static str, raw: Option<&str>) -> Result<String, RequestError> {
    let term = raw.map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(RequestError::Validation(field_error(
            field,
            "required",
            format!("{} must not be empty", field),
        )));
    }
    Ok(term.to_owned())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset"))
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// JSON body that has been deserialized and validated. Malformed bodies and
/// rule violations both become field-level 400 responses.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    B: Send + 'static,
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
{
    type Rejection = RequestError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                log::debug!("Rejected JSON body: {}", rejection);
                RequestError::Validation(field_error("body", "json", rejection.body_text()))
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string counterpart of [`ValidatedJson`].
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                log::debug!("Rejected query string: {}", rejection);
                RequestError::Validation(field_error("query", "query", rejection.body_text()))
            })?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("id", "12").unwrap(), 12);
        assert_eq!(parse_id("id", " 3 ").unwrap(), 3);
        for raw in ["0", "-4", "abc", "", "1.5", "99999999999999999999"] {
            assert!(
                matches!(parse_id("id", raw), Err(RequestError::Validation(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn search_terms_are_trimmed() {
        assert_eq!(require_search_term("username", Some("  ali ")).unwrap(), "ali");
        assert!(require_search_term("username", Some("   ")).is_err());
        assert!(require_search_term("username", None).is_err());
    }

    #[test]
    fn usernames_are_restricted_to_word_characters() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("alice bob").is_err());
        assert!(validate_username("al%ce").is_err());
    }
}
