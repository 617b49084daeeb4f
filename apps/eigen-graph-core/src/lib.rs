#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Eigen Graph Core - Restaking Dashboard Data Layer
//!
//! The non-presentational data layer behind a restaking analytics
//! dashboard: exact big-integer amount handling at token scale, ranked
//! chart series with an `"Other"` bucket, per-source flow normalization,
//! and a resilient WebSocket client for live price streams.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure types and algorithms
//!   - `amount`: Arbitrary-precision atomic amounts and their formatters
//!   - `ranking`: Top-N aggregation with an `"Other"` bucket
//!   - `flow`: Per-source scaled-integer share normalization
//!   - `snapshot`: Serde models of the aggregate snapshot document
//!   - `streaming`: Live point, status, and bounded buffer types
//!
//! - **Application**: Chart-series services composing the domain
//!   - `charts`: Bar, donut, and flow series preparation
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `config`: Environment-driven stream settings
//!   - `stream`: WebSocket price stream client with reconnection
//!   - `telemetry`: Tracing setup
//!
//! # Data Flow
//!
//! ```text
//! Snapshot JSON ──► domain::snapshot ──► application::charts ──► series
//! Price WS      ──► stream client    ──► validated points     ──► watch
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Pure types and algorithms with no I/O.
pub mod domain;

/// Application layer - Chart-series services.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::amount::{
    AtomicAmount, ParseAmountError, format_compact, format_power_of_ten, format_scientific,
};
pub use domain::flow::{DEFAULT_SHARE_THRESHOLD, FlowEdge, FlowShare, normalize_flow};
pub use domain::ranking::{BAR_TOP_N, DONUT_TOP_N, OTHER_LABEL, RankedSlice, rank_top_n};
pub use domain::snapshot::{AggregateSnapshot, BarRow, GraphRow, OperatorRow, TokenAggregates};
pub use domain::streaming::{DEFAULT_MAX_POINTS, LiveStatus, PointBuffer, StreamPoint};

// Application services
pub use application::charts::{
    avs_donut_series, graph_edges, shorten_id, strategy_flow_series, tvl_bar_series,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, StreamSettings};

// Stream client (for integration tests)
pub use infrastructure::stream::{
    BackoffConfig, BackoffPolicy, PriceStreamClient, StreamClientError, stream_symbol_for,
};
