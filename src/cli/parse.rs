//! CLI parse: clap types for modowners. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modowners - module ownership registry for a source tree
#[derive(Parser)]
#[command(name = "modowners")]
#[command(about = "Map source paths to ownership modules and the people responsible for them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Registry file (defaults to `registry_file` from settings, `mots.yml`)
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Settings file layered over the global settings
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new, empty registry file
    Init,
    /// Inspect and edit modules
    Module {
        #[command(subcommand)]
        command: ModuleCommands,
    },
    /// Validate the registry against the repository
    Validate {
        /// Repository root to resolve module paths against (default: the registry's directory)
        #[arg(long)]
        repo_path: Option<PathBuf>,
    },
    /// Compare stored hashes with the registry and its export
    CheckHashes,
    /// Re-sync people, normalise references and ordering, refresh export and hashes
    Clean {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Resolve paths to their owning modules
    Query {
        /// Paths relative to the repository root
        #[arg(required = true)]
        paths: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Render the registry as documentation
    Export {
        /// Export format (rst or md); defaults to the registry's, then the settings'
        #[arg(long)]
        format: Option<String>,
        /// Write to this file instead of standard output
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// People directory commands
    People {
        #[command(subcommand)]
        command: PeopleCommands,
    },
}

#[derive(Subcommand)]
pub enum ModuleCommands {
    /// List top-level modules
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one module or submodule
    Show {
        machine_name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add a module, optionally under a parent
    Add {
        /// Machine name; generated from --name when omitted
        #[arg(long)]
        machine_name: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Include pattern (repeatable)
        #[arg(long = "include")]
        includes: Vec<String>,
        /// Exclude pattern (repeatable)
        #[arg(long = "exclude")]
        excludes: Vec<String>,
        /// Owner directory id (repeatable)
        #[arg(long = "owner")]
        owners: Vec<u64>,
        /// Peer directory id (repeatable)
        #[arg(long = "peer")]
        peers: Vec<u64>,
        /// Machine name of the parent module
        #[arg(long)]
        parent: Option<String>,
        /// Print the resulting module without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum PeopleCommands {
    /// Search the people directory
    Search {
        query: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Re-sync stored people from the directory
    Refresh {
        /// Refresh every record, not only those never synced
        #[arg(long)]
        full: bool,
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}
