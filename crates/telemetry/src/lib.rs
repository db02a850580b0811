//! Internal telemetry for the scan log service.
//!
//! Counters and health state live in-process; there is no external
//! metrics system. Structured logging goes through `tracing`.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
