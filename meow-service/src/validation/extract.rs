//! Axum extractors that validate before the handler runs

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    response::{IntoResponse, Response},
};
use http::request::Parts;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::{query_payload, Rule, Violations};
use crate::filter::ApiError;

/// Types built from a validated JSON object
pub trait FromPayload: Sized {
    fn from_payload(payload: &Map<String, Value>) -> Result<Self, Violations>;
}

/// JSON body checked with [`FromPayload`]
///
/// An empty body is treated as `{}`. Body-read failures (such as the size
/// limit) keep their own response.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let payload = parse_object(&body).map_err(reject)?;
        T::from_payload(&payload).map(Self).map_err(reject)
    }
}

/// Query string checked with [`FromPayload`]
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: FromPayload,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|rejection| {
                reject(Violations::single("query", Rule::IsObject, rejection.body_text()))
            })?;
        T::from_payload(&query_payload(pairs)).map(Self).map_err(reject)
    }
}

fn reject(violations: Violations) -> Response {
    ApiError::Validation(violations).into_response()
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, Violations> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Violations::single(
            "body",
            Rule::IsObject,
            "body must be a JSON object",
        )),
        Err(e) => Err(Violations::single(
            "body",
            Rule::IsObject,
            format!("body must be a JSON object: {e}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(parse_object(b""), Ok(Map::new()));
        assert_eq!(parse_object(b"  \n"), Ok(Map::new()));
    }

    #[test]
    fn test_non_object_bodies() {
        for body in [&b"[1, 2]"[..], b"\"Luna\"", b"{\"name\": ", b"null"] {
            let violations = parse_object(body).unwrap_err();
            assert_eq!(violations.fields(), ["body"]);
            assert_eq!(violations.iter().next().unwrap().rule, Rule::IsObject);
        }
    }
}
