//! Platform abstraction layer
//!
//! Native helpers kept out of the deterministic simulation:
//! - Time/ticks (fixed-rate frame clock)

pub mod time;

pub use time::FrameClock;
