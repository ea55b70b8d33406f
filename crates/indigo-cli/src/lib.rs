//! Command-line front end for an Indigo record store.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations
//! - `document`: The schemaless JSON record the CLI stores

pub mod cli;
pub mod commands;
pub mod document;

pub use cli::{Cli, Commands};
pub use commands::{build_indigo, handle_command, init_logging, load_settings, open_indigo, run};
pub use document::Document;
