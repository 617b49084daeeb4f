//! Domain Layer
//!
//! Pure types and algorithms with no I/O: exact big-integer amounts and
//! their chart formatters, Top-N rank aggregation, per-source flow
//! normalization, the aggregate snapshot model, and live-streaming value
//! types.

pub mod amount;
pub mod flow;
pub mod ranking;
pub mod snapshot;
pub mod streaming;
