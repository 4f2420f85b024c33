pub mod audit_logs;
pub mod establishments;
pub mod order_items;
pub mod orders;
pub mod products;
