//! Infrastructure layer: I/O implementations, renderer and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod error;
pub mod image;
pub mod render;
pub mod traits;

pub use error::InfraError;
