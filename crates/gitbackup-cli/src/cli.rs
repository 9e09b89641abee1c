//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gitbackup - Snapshot Overleaf projects into per-user git histories
#[derive(Parser, Debug)]
#[command(name = "gitbackup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results (and errors) as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML settings file
    #[arg(long, global = true, env = "GITBACKUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Document store URI, e.g. mongodb://mongo:27017/sharelatex
    #[arg(long, global = true)]
    pub mongo_url: Option<String>,

    /// Host directory holding every identity's workspaces
    #[arg(long, global = true)]
    pub host_path: Option<PathBuf>,

    /// Seconds to wait for another run on the same workspace
    #[arg(long, global = true)]
    pub lock_wait: Option<u64>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export one project and commit it as a snapshot
    ///
    /// Examples:
    ///   gitbackup project alice@example.com 64b7f0c2e4b0a1a2b3c4d5e6
    ///   gitbackup project alice@example.com 64b7f0c2e4b0a1a2b3c4d5e6 --container sharelatex
    Project {
        /// Account email
        identity: String,

        /// Project id
        project_id: String,

        /// Name of the running platform container
        #[arg(long)]
        container: Option<String>,

        /// Directory inside the container the export is written to
        #[arg(long)]
        overleaf_path: Option<String>,

        /// Seconds the export may run before it is abandoned
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Snapshot the list of projects an identity can access
    Projects {
        /// Account email
        identity: String,
    },

    /// Show recent snapshots of a workspace
    History {
        /// Account email
        identity: String,

        /// Project id; the project list history when omitted
        project_id: Option<String>,

        /// Number of snapshots to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}
