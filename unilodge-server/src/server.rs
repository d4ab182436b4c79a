use crate::application::auth_service::AuthService;
use crate::application::listing_service::ListingService;
use crate::infrastructure::config::AppConfig;
use crate::presentation::dto::HealthResponse;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use crate::presentation::utils::{json_error_handler, path_error_handler};
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::Utc;
use tracing::info;

/// Registers the `/api` tree. Shared by the server and the HTTP tests.
pub fn configure_api(
    auth_service: AuthService,
    listing_service: ListingService,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let tokens = auth_service.tokens();

        cfg.app_data(web::Data::new(auth_service))
            .app_data(web::Data::new(listing_service))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::scope())
                    .service(handlers::listing::list_listings)
                    .service(handlers::listing::get_listing)
                    .service(
                        web::scope("/properties")
                            .wrap(JwtAuthMiddleware::new(tokens))
                            .service(handlers::listing::owner_listings)
                            .service(handlers::listing::create_listing)
                            .service(handlers::listing::update_listing)
                            .service(handlers::listing::delete_listing),
                    ),
            );
    }
}

pub async fn start_rest_server(
    config: AppConfig,
    auth_service: AuthService,
    listing_service: ListingService,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        App::new()
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(build_cors(&config))
            .configure(configure_api(auth_service.clone(), listing_service.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    if config.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
