use actix_web::{web, HttpRequest, HttpResponse};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::auth_service;
use crate::services::auth_service::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    match auth_service::register(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

pub async fn refresh_token(
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::RefreshTokenRequest>,
) -> HttpResponse {
    log::info!("🔄 POST /auth/refresh");

    match auth_service::refresh_token(&db, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Token refresh failed: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "valid": false,
                "error": "No valid Authorization header"
            }))
        }
    };

    match auth_service::verify_token(token) {
        Ok(claims) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "valid": true,
            "user_id": claims.sub,
            "email": claims.email,
            "role": claims.role,
            "exp": claims.exp
        })),
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "valid": false,
                "error": e
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "User information retrieved", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> HttpResponse {
    match auth_service::get_current_user(&db, &user.sub).await {
        Ok(info) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": info
        })),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/v1/auth/me - allow-listed profile update
pub async fn update_me(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<auth_service::UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("🔧 PATCH /auth/me - user {}", user.sub);

    match auth_service::update_profile(&db, &user.sub, &request).await {
        Ok(info) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": info
        })),
        Err(e) => e.to_response(),
    }
}
