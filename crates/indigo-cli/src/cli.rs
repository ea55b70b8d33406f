//! CLI argument parsing.
//!
//! CLI flags override every other config source.

use clap::{Parser, Subcommand};

/// Indigo record store
///
/// Stores JSON records in a local database and searches them by word.
#[derive(Parser, Debug)]
#[command(name = "indigo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/indigo/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Store a JSON record; include "id" to replace an existing one
    Put {
        /// Record as a JSON object
        json: String,
    },

    /// Print a record
    Get { id: u64 },

    /// Delete a record and its index entries
    Delete { id: u64 },

    /// List stored record ids
    List,

    /// Print the ids of records matching a word
    Search {
        /// Configured index id
        index: String,

        /// Word to look up
        term: String,
    },

    /// Rebuild every configured index from the stored records
    Reindex {
        /// Records per transaction (default from config)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Delete existing index documents first
        #[arg(long)]
        clear: bool,
    },
}
