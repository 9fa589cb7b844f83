use actix_web::HttpResponse;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Duplicate(String),
    InvalidRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Duplicate(msg) => write!(f, "Duplicate: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps the error to the HTTP response envelope. Database errors are
    /// logged server-side and answered with a generic message.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            AppError::Database(msg) => {
                log::error!("❌ Database error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "error": "Internal server error"
                }))
            }
            AppError::NotFound(msg) => HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
            AppError::Duplicate(msg) => HttpResponse::Conflict().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
            AppError::InvalidRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": msg
            })),
        }
    }
}

/// MongoDB duplicate-key violations (unique index) surface as write error 11000.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref we))
            if we.code == 11000
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AppError::NotFound("Property not found".to_string());
        assert_eq!(err.to_string(), "Not found: Property not found");

        let err = AppError::Duplicate("Already in wishlist".to_string());
        assert_eq!(err.to_string(), "Duplicate: Already in wishlist");
    }

    #[test]
    fn test_status_mapping() {
        use actix_web::http::StatusCode;

        assert_eq!(
            AppError::NotFound("x".into()).to_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("x".into()).to_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Duplicate("x".into()).to_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Database("boom".into()).to_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
