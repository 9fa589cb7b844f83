use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

/// GET /api/v1/contact - static support channel info, no persistence
pub async fn get_contact_info() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "email": "support@estate-service.com",
        "phone": "+91 98765 43210",
        "hours": "Mon-Sat 9:00-18:00 IST"
    }))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/contact",
    tag = "Contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Ticket acknowledged"),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn submit_contact(request: web::Json<ContactRequest>) -> impl Responder {
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.message.trim().is_empty()
    {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "name, email and message are required"
        }));
    }

    // Stateless echo: nothing is stored
    let ticket_id = Uuid::new_v4().to_string();
    log::info!("📨 Contact ticket {} from {}", ticket_id, request.email);

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "ticket_id": ticket_id,
        "received_at": chrono::Utc::now().timestamp(),
        "message": "We will get back to you shortly"
    }))
}
