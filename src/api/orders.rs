use actix_web::{web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{CreateOrderRequest, OrderResponse, UpdateOrderRequest};
use crate::services::order_service;

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid request")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateOrderRequest>,
) -> impl Responder {
    log::info!("📝 POST /orders - user {}", user.sub);

    match order_service::create_order(&db, &user, request.into_inner()).await {
        Ok(order) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "order": order
        })),
        Err(e) => e.to_response(),
    }
}

/// GET /api/v1/orders - caller's orders (admin: all)
pub async fn list_orders(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    match order_service::list_orders(&db, &user).await {
        Ok(orders) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "orders": orders,
            "total": orders.len()
        })),
        Err(e) => e.to_response(),
    }
}

/// GET /api/v1/orders/{id} - owner-or-admin
pub async fn get_order(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    match order_service::get_order(&db, &user, &path.into_inner()).await {
        Ok(order) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "order": order
        })),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/v1/orders/{id} - owner-or-admin, allow-listed fields
pub async fn update_order(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateOrderRequest>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🔧 PATCH /orders/{} - user {}", id, user.sub);

    match order_service::update_order(&db, &user, &id, &request).await {
        Ok(order) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "order": order
        })),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/v1/orders/{id} - owner-or-admin
pub async fn delete_order(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🗑️  DELETE /orders/{} - user {}", id, user.sub);

    match order_service::delete_order(&db, &user, &id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Order deleted successfully"
        })),
        Err(e) => e.to_response(),
    }
}
