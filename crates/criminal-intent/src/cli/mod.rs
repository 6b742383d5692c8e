//! Command-line interface for criminal-intent.
//!
//! This module provides the CLI structure and text rendering for the `crimes`
//! binary.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand,
    ShowCommand, StatsCommand, ThemeCommand,
};
pub use output::{render_crime, render_list, render_stats, render_themes};

/// crimes - Keep a record of office crimes
///
/// Records incidents with a title, details, date, solved flag and an optional
/// photo, stored locally.
#[derive(Debug, Parser)]
#[command(name = "crimes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List recorded crimes
    List(ListCommand),

    /// Show one crime
    Show(ShowCommand),

    /// Record a new crime
    Add(AddCommand),

    /// Change an existing crime
    Edit(EditCommand),

    /// Delete a crime
    Delete(DeleteCommand),

    /// Delete every crime
    Clear(ClearCommand),

    /// Summarize recorded crimes
    Stats(StatsCommand),

    /// View or change the theme
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
