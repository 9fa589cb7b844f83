use actix_web::{web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{
    AddMaterialRequest, AddMilestoneRequest, AddWorkerRequest, CreateProjectRequest,
    ProjectResponse, UpdateProjectRequest,
};
use crate::services::construction_service;

#[utoipa::path(
    post,
    path = "/api/v1/construction",
    tag = "Construction",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Missing required fields")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreateProjectRequest>,
) -> impl Responder {
    log::info!("📝 POST /construction - user {}", user.sub);

    match construction_service::create_project(&db, &user, request.into_inner()).await {
        Ok(project) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

/// GET /api/v1/construction - caller's projects (admin: all)
pub async fn list_projects(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    match construction_service::list_projects(&db, &user).await {
        Ok(projects) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "projects": projects,
            "total": projects.len()
        })),
        Err(e) => e.to_response(),
    }
}

/// GET /api/v1/construction/{id} - owner-or-admin only
pub async fn get_project(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    match construction_service::get_project(&db, &user, &path.into_inner()).await {
        Ok(project) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/v1/construction/{id} - owner-or-admin, allow-listed fields
pub async fn update_project(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<UpdateProjectRequest>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🔧 PATCH /construction/{} - user {}", id, user.sub);

    match construction_service::update_project(&db, &user, &id, &request).await {
        Ok(project) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/construction/{id}/approve",
    tag = "Construction",
    responses(
        (status = 200, description = "Project approved", body = ProjectResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_project(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("✔️  PATCH /construction/{}/approve - admin {}", id, user.sub);

    match construction_service::approve_project(&db, &user, &id).await {
        Ok(project) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

/// POST /api/v1/construction/{id}/milestones
pub async fn add_milestone(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<AddMilestoneRequest>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("📝 POST /construction/{}/milestones - user {}", id, user.sub);

    match construction_service::add_milestone(&db, &user, &id, request.into_inner()).await {
        Ok(project) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

/// PATCH /api/v1/construction/{id}/milestones/{milestone_id}/complete
pub async fn complete_milestone(
    user: web::ReqData<Claims>,
    path: web::Path<(String, String)>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let (id, milestone_id) = path.into_inner();
    log::info!(
        "✔️  PATCH /construction/{}/milestones/{}/complete - user {}",
        id,
        milestone_id,
        user.sub
    );

    match construction_service::complete_milestone(&db, &user, &id, &milestone_id).await {
        Ok(project) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

/// POST /api/v1/construction/{id}/materials
pub async fn add_material(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<AddMaterialRequest>,
) -> impl Responder {
    let id = path.into_inner();

    match construction_service::add_material(&db, &user, &id, request.into_inner()).await {
        Ok(project) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

/// POST /api/v1/construction/{id}/workers
pub async fn add_worker(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
    request: web::Json<AddWorkerRequest>,
) -> impl Responder {
    let id = path.into_inner();

    match construction_service::add_worker(&db, &user, &id, request.into_inner()).await {
        Ok(project) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "project": project
        })),
        Err(e) => e.to_response(),
    }
}

/// DELETE /api/v1/construction/{id}
pub async fn delete_project(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let id = path.into_inner();
    log::info!("🗑️  DELETE /construction/{} - user {}", id, user.sub);

    match construction_service::delete_project(&db, &user, &id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Project deleted successfully"
        })),
        Err(e) => e.to_response(),
    }
}
