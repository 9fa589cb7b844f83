use actix_web::{web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{AddWishlistRequest, WishlistEntryResponse};
use crate::services::wishlist_service;

/// GET /api/v1/wishlist - the caller's favorites
pub async fn list_wishlist(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    match wishlist_service::list_wishlist(&db, &user.sub).await {
        Ok(entries) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "wishlist": entries,
            "total": entries.len()
        })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/wishlist",
    tag = "Wishlist",
    request_body = AddWishlistRequest,
    responses(
        (status = 201, description = "Added to wishlist", body = WishlistEntryResponse),
        (status = 409, description = "Property already in wishlist")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_to_wishlist(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<AddWishlistRequest>,
) -> impl Responder {
    log::info!("📝 POST /wishlist - user {}", user.sub);

    match wishlist_service::add_to_wishlist(&db, &user.sub, request.into_inner()).await {
        Ok(entry) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "entry": entry
        })),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/v1/wishlist/{property_id}
pub async fn remove_from_wishlist(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let property_id = path.into_inner();
    log::info!("🗑️  DELETE /wishlist/{} - user {}", property_id, user.sub);

    match wishlist_service::remove_from_wishlist(&db, &user.sub, &property_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Removed from wishlist"
        })),
        Err(e) => e.to_response(),
    }
}
