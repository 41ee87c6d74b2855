//! Test utilities for audio testing
//!
//! Signal generators that build ready-made `AudioBuffer`s and a handful of
//! measurements for checking processed output. Used by the unit tests,
//! integration tests and benchmarks.

pub mod analysis;
pub mod signals;
