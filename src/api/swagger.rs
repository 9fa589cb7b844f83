use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Estate Service API",
        version = "1.0.0",
        description = "Rental/sale/construction marketplace API.\n\n**Authentication:** Most endpoints require a JWT Bearer token.\n\n**Features:**\n- Email/password authentication with role-based access\n- Property listing CRUD and filtered search\n- Booking/sale/construction orders\n- Per-user wishlist\n- Construction projects with milestones and admin approval",
        contact(
            name = "Estate Service Team",
            email = "support@estate-service.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health
        crate::api::health::health_check,

        // Properties
        crate::api::properties::search_properties,
        crate::api::properties::get_property,
        crate::api::properties::create_property,

        // Orders
        crate::api::orders::create_order,

        // Wishlist
        crate::api::wishlist::add_to_wishlist,

        // Construction
        crate::api::construction::create_project,
        crate::api::construction::approve_project,

        // Contact
        crate::api::contact::submit_contact,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,

            // Health
            crate::api::health::HealthResponse,

            // Properties
            crate::models::property::CreatePropertyRequest,
            crate::models::property::UpdatePropertyRequest,
            crate::models::property::PropertyResponse,
            crate::models::property::LandlordInfo,
            crate::models::property::NearbyPlace,
            crate::models::property::Pagination,

            // Orders
            crate::models::order::CreateOrderRequest,
            crate::models::order::UpdateOrderRequest,
            crate::models::order::OrderResponse,

            // Wishlist
            crate::models::wishlist::AddWishlistRequest,
            crate::models::wishlist::WishlistEntryResponse,

            // Construction
            crate::models::construction::CreateProjectRequest,
            crate::models::construction::UpdateProjectRequest,
            crate::models::construction::ProjectResponse,
            crate::models::construction::ProjectStats,
            crate::models::construction::Milestone,
            crate::models::construction::Material,
            crate::models::construction::Worker,
            crate::models::construction::AddMilestoneRequest,
            crate::models::construction::AddMaterialRequest,
            crate::models::construction::AddWorkerRequest,

            // Contact
            crate::api::contact::ContactRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication and profile endpoints. Email/password with role-based claims."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Properties", description = "Listing CRUD and filtered search. Reads are public; mutations require a landlord or admin token."),
        (name = "Orders", description = "Booking/sale/construction orders, scoped to the authenticated user."),
        (name = "Wishlist", description = "Per-user favorites with a unique (user, property) constraint."),
        (name = "Construction", description = "Construction projects with embedded milestones, materials and workers. Approval is admin-only."),
        (name = "Contact", description = "Stateless contact ticket echo."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
