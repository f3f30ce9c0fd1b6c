//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ChartRenderer)
//! but are themselves concrete structs, not traits.

mod chart;

pub use chart::ChartService;
