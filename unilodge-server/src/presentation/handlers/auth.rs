use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, post, web};
use tracing::info;

pub fn scope() -> Scope {
    web::scope("/auth").service(register).service(login)
}

#[post("/register")]
async fn register(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let RegisterRequest { email, password } = payload.into_inner();
    let user = service
        .register(
            email.as_deref().unwrap_or_default(),
            password.as_deref().unwrap_or_default(),
        )
        .await?;

    info!(request_id = %request_id(&req), user_id = %user.id, "user registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "user registered successfully".to_string(),
        user_id: user.id,
    }))
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let LoginRequest { email, password } = payload.into_inner();
    let outcome = service
        .login(
            email.as_deref().unwrap_or_default(),
            password.as_deref().unwrap_or_default(),
        )
        .await?;

    info!(request_id = %request_id(&req), user_id = %outcome.user_id, "user logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.token,
        user_id: outcome.user_id,
    }))
}
