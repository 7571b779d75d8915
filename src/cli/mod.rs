//! CLI module for the expense tracker
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply the PostgreSQL schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Expense Tracker - personal expense tracking API
#[derive(Parser)]
#[command(name = "expense-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Apply pending database migrations
    Migrate,
}
