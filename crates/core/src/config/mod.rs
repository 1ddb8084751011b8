//! Configuration loading and schema definitions
//!
//! Shared `h2site.toml` configuration used by the CLI and library crates.

mod loader;
mod schema;

pub use loader::{Config, CONFIG_FILE_NAME};
pub use schema::*;
