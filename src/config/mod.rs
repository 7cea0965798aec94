//! Configuration for cluster-reflector
//!
//! Supports a built-in default layer, an optional YAML file, and command-line
//! overrides applied by the CLI.

pub mod duration;
pub mod loader;
pub mod schema;

pub use duration::{format_duration, parse_duration};
pub use loader::ConfigLoader;
pub use schema::{Config, ConfigError, LogFormat};
