use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use crate::domain::error::DomainError;
use crate::infrastructure::security::TokenService;
use crate::presentation::utils::{AuthenticatedUser, bearer_token};
use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, info};
use uuid::Uuid;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
static TIMING_HEADER: HeaderName = HeaderName::from_static("server-timing");

#[derive(Clone)]
pub struct RequestId(pub String);

pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_owned())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut().insert(RequestId(request_id.clone()));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                res.response_mut()
                    .headers_mut()
                    .insert(REQUEST_ID_HEADER.clone(), value);
            }
            Ok(res)
        })
    }
}

/// Rejects the request with `401` unless it carries a valid bearer token.
///
/// A missing header, a malformed header and a token that fails verification
/// all produce the same response. On success the caller's identity is stored
/// in the request extensions as [`AuthenticatedUser`].
pub struct JwtAuthMiddleware {
    tokens: Arc<dyn TokenService>,
}

impl JwtAuthMiddleware {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthService {
            service: Rc::new(service),
            tokens: Arc::clone(&self.tokens),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
    tokens: Arc<dyn TokenService>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let tokens = Arc::clone(&self.tokens);
        let service = Rc::clone(&self.service);
        let token = bearer_token(req.headers());

        Box::pin(async move {
            let verified = match token {
                Some(token) => tokens.verify(&token).await.map_err(|err| {
                    debug!(path = %req.path(), error = %err, "bearer token rejected");
                }),
                None => {
                    debug!(path = %req.path(), "missing or malformed authorization header");
                    Err(())
                }
            };

            let Ok(identity) = verified else {
                let response = DomainError::Unauthenticated.error_response();
                return Ok(req.into_response(response).map_into_right_body());
            };

            req.extensions_mut().insert(AuthenticatedUser {
                id: identity.user_id,
                email: identity.email,
            });
            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

pub struct TimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService { service }))
    }
}

pub struct TimingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let rid = req
            .extensions()
            .get::<RequestId>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| "unknown".into());

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let duration = start.elapsed();
            info!(
                request_id = %rid,
                method = %method,
                path = %path,
                status = res.status().as_u16(),
                duration_ms = duration.as_millis() as u64,
                "request completed"
            );

            if let Ok(value) = HeaderValue::from_str(&format!("app;dur={}", duration.as_millis())) {
                res.response_mut()
                    .headers_mut()
                    .insert(TIMING_HEADER.clone(), value);
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::security::JwtKeys;
    use actix_web::{App, HttpResponse, test, web};

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "id": user.id, "email": user.email }))
    }

    fn keys() -> Arc<JwtKeys> {
        Arc::new(JwtKeys::new("middleware-secret".into()))
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler_with_identity() {
        let keys = keys();
        let app = test::init_service(
            App::new().service(
                web::scope("/private")
                    .wrap(JwtAuthMiddleware::new(keys.clone()))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, "a@x.com").await.unwrap();
        let req = test::TestRequest::get()
            .uri("/private/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], user_id.to_string());
        assert_eq!(body["email"], "a@x.com");
    }

    #[actix_web::test]
    async fn every_rejection_looks_the_same() {
        let keys = keys();
        let other = JwtKeys::new("someone-elses-secret".into());
        let foreign = other.issue(Uuid::new_v4(), "b@x.com").await.unwrap();
        let valid = keys.issue(Uuid::new_v4(), "a@x.com").await.unwrap();

        let app = test::init_service(
            App::new().service(
                web::scope("/private")
                    .wrap(JwtAuthMiddleware::new(keys))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let headers: Vec<Option<String>> = vec![
            None,
            Some(valid),
            Some("Bearer ".into()),
            Some("Bearer garbage".into()),
            Some(format!("Bearer {foreign}")),
        ];

        let mut bodies = Vec::new();
        for header in headers {
            let mut req = test::TestRequest::get().uri("/private/me");
            if let Some(value) = header {
                req = req.insert_header(("Authorization", value));
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), 401);
            bodies.push(test::read_body(resp).await);
        }
        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }

    #[actix_web::test]
    async fn identity_extractor_outside_the_gate_is_unauthenticated() {
        let app = test::init_service(App::new().route("/me", web::get().to(whoami))).await;
        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn request_id_is_echoed_or_generated() {
        let app = test::init_service(
            App::new()
                .wrap(TimingMiddleware)
                .wrap(RequestIdMiddleware)
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/ping")
            .insert_header(("x-request-id", "req-42"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-42");
        assert!(resp.headers().contains_key("server-timing"));

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;
        let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(generated).is_ok());
    }
}
