pub mod admission;
pub mod auth_service;
pub mod establishment_service;
pub mod order_service;
pub mod order_store;
pub mod schedule;
