//! Infrastructure Layer
//!
//! Adapters to the outside world: environment configuration, the live
//! price WebSocket client, and tracing setup.

pub mod config;
pub mod stream;
pub mod telemetry;
