//! Indigo command line
//!
//! # Usage
//!
//! ```bash
//! indigo put '{"name": "Tomato"}'
//! indigo search names tom
//! indigo reindex --clear
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/indigo/config.toml)
//! 3. Environment variables (INDIGO_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use indigo_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}
