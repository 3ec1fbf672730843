//! CubeView deterministic scenario harness.
//!
//! Builds cubes from the bundled demo dataset or from seeded synthetic
//! workloads and drives scripted interaction scenarios through the
//! selection state machine. All entropy derives from a single 64-bit
//! seed, so any scenario failure is reproducible by its seed number.

pub mod dataset;
pub mod generator;
pub mod runner;
pub mod scenarios;

pub use generator::WorkloadGenerator;
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
