//! Integration test modules for wekbridge
//!
//! - cycle: outbound sends and inbound frames across ticks
//! - lifecycle: listener binding, rebinding and release

pub mod cycle;
pub mod lifecycle;
