//! Real-time push of order events to connected dashboards.

pub mod gateway;
pub mod registry;

pub use registry::{ConnectionHandle, ConnectionRegistry, RealtimeEvent};
