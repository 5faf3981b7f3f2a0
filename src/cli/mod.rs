//! Command-line interface for Marquee.

mod commands;

use clap::{Parser, Subcommand};

/// Marquee - movie catalog service
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Print an Argon2 hash for the admin credential
    HashPassword { password: String },

    /// List catalog movies
    #[command(alias = "ls")]
    Movies {
        /// Only movies linked to this genre id
        #[arg(long)]
        genre: Option<i32>,
    },
}

pub use commands::*;
