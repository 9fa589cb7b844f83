pub mod construction;
pub mod order;
pub mod property;
pub mod user;
pub mod wishlist;

pub use construction::*;
pub use order::*;
pub use property::*;
pub use user::*;
pub use wishlist::*;
