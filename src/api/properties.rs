use actix_web::{web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{
    CreatePropertyRequest, PropertyResponse, PropertySearchQuery, UpdatePropertyRequest,
};
use crate::services::property_service;

#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = "Properties",
    params(PropertySearchQuery),
    responses(
        (status = 200, description = "Filtered, paginated listing search")
    )
)]
pub async fn search_properties(
    query: web::Query<PropertySearchQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    match property_service::search(&db, &query).await {
        Ok((properties, pagination)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "properties": properties,
            "pagination": pagination
        })),
        Err(e) => e.to_response(),
    }
}

/// GET /api/v1/properties/featured - curated front-page listings
pub async fn featured_properties(db: web::Data<MongoDB>) -> impl Responder {
    match property_service::featured(&db).await {
        Ok(properties) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "properties": properties,
            "total": properties.len()
        })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    tag = "Properties",
    responses(
        (status = 200, description = "Listing detail", body = PropertyResponse),
        (status = 400, description = "Invalid property ID"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    match property_service::get_property(&db, &path.into_inner()).await {
        Ok(property) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "property": property
        })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = "Properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Listing created", body = PropertyResponse),
        (status = 403, description = "Caller is not a landlord")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_property(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreatePropertyRequest>,
) -> impl Responder {
    log::info!("📝 POST /properties - landlord {}", user.sub);

    match property_service::create_property(&db, &user, request.into_inner()).await {
        Ok(property) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "property": property
        })),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/v1/properties/{id} - owner-or-admin, allow-listed fields
pub async fn update_property(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdatePropertyRequest>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🔧 PATCH /properties/{} - user {}", id, user.sub);

    match property_service::update_property(&db, &user, &id, &request).await {
        Ok(property) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "property": property
        })),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/v1/properties/{id} - owner-or-admin, hard delete
pub async fn delete_property(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🗑️  DELETE /properties/{} - user {}", id, user.sub);

    match property_service::delete_property(&db, &user, &id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Property deleted successfully"
        })),
        Err(e) => e.to_response(),
    }
}
