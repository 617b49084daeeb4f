//! Tracing Setup
//!
//! Structured logging through `tracing-subscriber`, filtered via
//! `RUST_LOG` with a sensible default for this crate.
//!
//! # Usage
//!
//! ```ignore
//! use eigen_graph_core::infrastructure::telemetry;
//!
//! fn main() {
//!     telemetry::init();
//!     tracing::info!("starting");
//! }
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `eigen_graph_core=info` filter.
/// Calling this more than once is an error in the underlying registry,
/// so it should happen exactly once at startup.
#[allow(clippy::expect_used)]
pub fn init() {
    let env_filter = EnvFilter::from_default_env().add_directive(
        "eigen_graph_core=info"
            .parse()
            .expect("static directive 'eigen_graph_core=info' is valid"),
    );

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
