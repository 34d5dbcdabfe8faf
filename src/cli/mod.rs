//! Command-line interface for the coursehub service.

mod commands;

use clap::{Parser, Subcommand};

/// Coursehub - course marketplace backend
#[derive(Parser)]
#[command(name = "coursehub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create the admin account if it does not exist yet
    SeedAdmin {
        /// Defaults to `admin.username` from the config
        #[arg(long)]
        username: Option<String>,
        /// Defaults to `admin.password` from the config
        #[arg(long)]
        password: Option<String>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Insert sample courses, enrollments and payments over the last three months
    #[command(alias = "seed")]
    SeedSampleData,

    /// Print the admin overview and payment counts
    #[command(alias = "overview")]
    Stats,
}

pub use commands::*;
