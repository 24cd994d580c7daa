//! CLI module for the Activise API
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server (default)
//! - `migrate`: apply pending schema migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Activise API - course marketplace backend
#[derive(Parser)]
#[command(name = "activise-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply pending schema migrations and exit
    Migrate,
}
