pub mod auth;
pub mod establishments;
pub mod orders;
