// fusion_sim/src/simulation/mod.rs

//! Everything around the filter: configuration, observation sources,
//! evaluation and the run loop.

pub mod core;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod runner;
pub mod scenario;
