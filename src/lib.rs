//! Kitchen config generator
//!
//! This library selects OS images for a platform and provider from a JSON
//! catalog, concatenates YAML fragments into a staging document and runs an
//! external template renderer over it to produce `kitchen.yml`.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod common;
pub mod generate;
pub mod render;
pub mod staging;
pub mod uservars;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use generate::{generate, GenerateOptions, GenerateReport};
