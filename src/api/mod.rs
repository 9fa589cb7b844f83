pub mod auth;
pub mod construction;
pub mod contact;
pub mod health;
pub mod orders;
pub mod properties;
pub mod swagger;
pub mod wishlist;
