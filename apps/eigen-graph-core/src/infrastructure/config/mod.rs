//! Configuration
//!
//! Environment-driven settings for the live price stream.

mod settings;

pub use settings::{ConfigError, StreamSettings};
