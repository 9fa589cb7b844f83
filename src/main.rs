mod api;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let database_url = env::var("MONGODB_URI")
        .or_else(|_| env::var("MONGO_URI"))
        .expect("MONGODB_URI must be set");
    let database_name = env::var("MONGODB_DB").ok();

    log::info!("🚀 Starting Estate Service...");

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url, database_name.as_deref())
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // 🌱 Seed sample listings into a fresh deployment
    seeds::property_seed::seed_sample_properties(&db).await;

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000") // Frontend dev server
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints (register/login/refresh/verify are public)
            .service(
                web::scope("/api/v1/auth")
                    .route("/register", web::post().to(api::auth::register))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/refresh", web::post().to(api::auth::refresh_token))
                    .route("/verify", web::get().to(api::auth::verify_token))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::auth::AuthMiddleware::required())
                            .route(web::get().to(api::auth::get_me))
                            .route(web::patch().to(api::auth::update_me)),
                    ),
            )
            // Properties: reads are public, mutations require a bearer token
            .service(
                web::scope("/api/v1/properties")
                    .wrap(middleware::auth::AuthMiddleware::public_reads())
                    .route("/featured", web::get().to(api::properties::featured_properties))
                    .route("", web::get().to(api::properties::search_properties))
                    .route("", web::post().to(api::properties::create_property))
                    .route("/{id}", web::get().to(api::properties::get_property))
                    .route("/{id}", web::patch().to(api::properties::update_property))
                    .route("/{id}", web::delete().to(api::properties::delete_property)),
            )
            // Orders: booking/sale/construction transactions
            .service(
                web::scope("/api/v1/orders")
                    .wrap(middleware::auth::AuthMiddleware::required())
                    .route("", web::post().to(api::orders::create_order))
                    .route("", web::get().to(api::orders::list_orders))
                    .route("/{id}", web::get().to(api::orders::get_order))
                    .route("/{id}", web::patch().to(api::orders::update_order))
                    .route("/{id}", web::delete().to(api::orders::delete_order)),
            )
            // Wishlist: per-user favorites
            .service(
                web::scope("/api/v1/wishlist")
                    .wrap(middleware::auth::AuthMiddleware::required())
                    .route("", web::get().to(api::wishlist::list_wishlist))
                    .route("", web::post().to(api::wishlist::add_to_wishlist))
                    .route(
                        "/{property_id}",
                        web::delete().to(api::wishlist::remove_from_wishlist),
                    ),
            )
            // Construction: project CRUD, admin approval, milestone mutation
            .service(
                web::scope("/api/v1/construction")
                    .wrap(middleware::auth::AuthMiddleware::required())
                    .route("", web::post().to(api::construction::create_project))
                    .route("", web::get().to(api::construction::list_projects))
                    .route("/{id}", web::get().to(api::construction::get_project))
                    .route("/{id}", web::patch().to(api::construction::update_project))
                    .route("/{id}", web::delete().to(api::construction::delete_project))
                    .route("/{id}/approve", web::patch().to(api::construction::approve_project))
                    .route("/{id}/milestones", web::post().to(api::construction::add_milestone))
                    .route(
                        "/{id}/milestones/{milestone_id}/complete",
                        web::patch().to(api::construction::complete_milestone),
                    )
                    .route("/{id}/materials", web::post().to(api::construction::add_material))
                    .route("/{id}/workers", web::post().to(api::construction::add_worker)),
            )
            // Contact: stateless ticket echo
            .service(
                web::scope("/api/v1/contact")
                    .route("", web::get().to(api::contact::get_contact_info))
                    .route("", web::post().to(api::contact::submit_contact)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
