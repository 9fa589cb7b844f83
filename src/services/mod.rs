pub mod auth_service;
pub mod construction_service;
pub mod order_service;
pub mod property_service;
pub mod wishlist_service;
