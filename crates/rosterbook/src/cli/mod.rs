//! Command-line interface for rosterbook.
//!
//! This module provides the CLI structure and command definitions for the
//! `rbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, ListCommand, MarksCommand, RemoveCommand, StatusCommand, TopCommand,
};

/// rbook - Manage a student roster from the terminal
///
/// Keeps a small collection of student records in a flat JSON file. With no
/// subcommand, rbook opens the interactive menu.
#[derive(Debug, Parser)]
#[command(name = "rbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the roster data file (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to the interactive menu)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the interactive menu
    Menu,

    /// Add a student to the roster
    Add(AddCommand),

    /// Record or overwrite a mark for a student
    Marks(MarksCommand),

    /// Remove a student from the roster
    Remove(RemoveCommand),

    /// Show the student with the highest average mark
    Top(TopCommand),

    /// List all students sorted by department and name
    List(ListCommand),

    /// Show roster statistics
    Status(StatusCommand),

    /// View or validate configuration
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
