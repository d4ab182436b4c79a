use actix_web::dev::Payload;
use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};
use serde_json::json;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::presentation::middleware::RequestId;

/// Caller identity injected by `JwtAuthMiddleware`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(DomainError::Unauthenticated.into())),
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header. `None` for a missing
/// header, a non-ASCII value, another scheme or an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    DomainError::Validation(format!("invalid request body: {err}")).into()
}

/// Ids that do not parse cannot name an existing resource.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    let response = HttpResponse::NotFound().json(json!({ "message": "not found" }));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers_with(value: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(
            bearer_token(&headers_with(b"Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn malformed_headers_yield_nothing() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with(b"abc.def.ghi")), None);
        assert_eq!(bearer_token(&headers_with(b"Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers_with(b"Bearer")), None);
        assert_eq!(bearer_token(&headers_with(b"Bearer    ")), None);
        assert_eq!(bearer_token(&headers_with(b"bearer abc")), None);
        assert_eq!(bearer_token(&headers_with(&[0x42, 0xff, 0xfe])), None);
    }
}
