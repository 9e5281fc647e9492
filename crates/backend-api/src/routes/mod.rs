pub mod health;
pub mod providers;
pub mod session;
pub mod storefront;
