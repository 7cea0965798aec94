//! CLI command handling module
//!
//! Handles argument parsing and the serve, healthcheck and version commands.

mod args;
mod healthcheck;
mod logging;
mod serve;
mod version;

pub use args::{Cli, Command, ServeArgs};
pub use healthcheck::run_healthcheck;
pub use logging::*;
pub use serve::run_server;
pub use version::display_version;
