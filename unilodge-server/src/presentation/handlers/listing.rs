use crate::application::listing_service::ListingService;
use crate::domain::error::DomainError;
use crate::presentation::dto::ListingRequest;
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

// ---- public ----

#[get("/properties")]
pub async fn list_listings(
    req: HttpRequest,
    listings: web::Data<ListingService>,
) -> Result<HttpResponse, DomainError> {
    let all = listings.list_all().await?;

    info!(request_id = %request_id(&req), count = all.len(), "listings retrieved");

    Ok(HttpResponse::Ok().json(all))
}

#[get("/properties/{id}")]
pub async fn get_listing(
    listings: web::Data<ListingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let listing = listings.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(listing))
}

// ---- behind JwtAuthMiddleware, mounted under /properties ----

#[get("/owner/{user_id}")]
pub async fn owner_listings(
    req: HttpRequest,
    user: AuthenticatedUser,
    listings: web::Data<ListingService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    // an owner id that does not parse can never be the caller's
    let owner_id = Uuid::parse_str(&path).map_err(|_| DomainError::Forbidden)?;
    let owned = listings.list_by_owner(owner_id, user.id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        count = owned.len(),
        "owner listings retrieved"
    );

    Ok(HttpResponse::Ok().json(owned))
}

#[post("")]
pub async fn create_listing(
    req: HttpRequest,
    user: AuthenticatedUser,
    listings: web::Data<ListingService>,
    payload: web::Json<ListingRequest>,
) -> Result<HttpResponse, DomainError> {
    let draft = payload.into_inner().into_draft()?;
    let listing = listings.create(user.id, draft).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        listing_id = %listing.id,
        "listing created"
    );

    Ok(HttpResponse::Created().json(listing))
}

#[put("/{id}")]
pub async fn update_listing(
    req: HttpRequest,
    user: AuthenticatedUser,
    listings: web::Data<ListingService>,
    payload: web::Json<ListingRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let draft = payload.into_inner().into_draft()?;
    let listing = listings.update(user.id, path.into_inner(), draft).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        listing_id = %listing.id,
        "listing updated"
    );

    Ok(HttpResponse::Ok().json(listing))
}

#[delete("/{id}")]
pub async fn delete_listing(
    req: HttpRequest,
    user: AuthenticatedUser,
    listings: web::Data<ListingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let listing_id = path.into_inner();
    listings.delete(user.id, listing_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        listing_id = %listing_id,
        "listing deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
