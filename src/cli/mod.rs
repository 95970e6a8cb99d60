//! Command-line interface for the alumni service.

mod commands;

use clap::{Parser, Subcommand};

/// Alumni directory service
#[derive(Parser)]
#[command(name = "alumni")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Write a default config file and create the database
    #[command(alias = "--init")]
    Init,

    /// Insert sample alumni records into an empty directory
    Seed,

    /// Create an admin account
    CreateAdmin {
        username: String,
        password: String,
    },
}

pub use commands::*;
