//! Application Layer
//!
//! Composes the domain pipeline into the chart-series services consumed
//! by the dashboard surface.

pub mod charts;
