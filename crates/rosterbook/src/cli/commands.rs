//! CLI command definitions.
//!
//! This module defines the argument structures of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Unique student ID
    #[arg(long)]
    pub id: String,

    /// Student name
    #[arg(long)]
    pub name: String,

    /// Student age (must be positive)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub age: u32,

    /// Department name
    #[arg(long)]
    pub department: String,

    /// Initial mark as SUBJECT=SCORE (repeatable)
    #[arg(long = "mark", value_name = "SUBJECT=SCORE", value_parser = parse_mark)]
    pub marks: Vec<(String, u32)>,
}

/// Marks command arguments.
#[derive(Debug, Args)]
pub struct MarksCommand {
    /// Student ID
    pub id: String,

    /// Subject name (created if not yet recorded)
    pub subject: String,

    /// The mark to record
    pub score: u32,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Student ID
    pub id: String,
}

/// Top command arguments.
#[derive(Debug, Args)]
pub struct TopCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Parse a `SUBJECT=SCORE` pair from the command line.
fn parse_mark(raw: &str) -> Result<(String, u32), String> {
    let (subject, score) = raw
        .split_once('=')
        .ok_or_else(|| format!("'{raw}' must be SUBJECT=SCORE"))?;
    if subject.is_empty() {
        return Err(format!("'{raw}' has an empty subject name"));
    }
    let score = score
        .parse::<u32>()
        .map_err(|_| format!("'{score}' is not a valid whole number"))?;
    Ok((subject.to_string(), score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mark_valid() {
        assert_eq!(parse_mark("math=85"), Ok(("math".to_string(), 85)));
    }

    #[test]
    fn test_parse_mark_missing_separator() {
        let err = parse_mark("math85").unwrap_err();
        assert!(err.contains("SUBJECT=SCORE"));
    }

    #[test]
    fn test_parse_mark_empty_subject() {
        let err = parse_mark("=85").unwrap_err();
        assert!(err.contains("empty subject"));
    }

    #[test]
    fn test_parse_mark_bad_score() {
        let err = parse_mark("math=high").unwrap_err();
        assert!(err.contains("whole number"));
    }

    #[test]
    fn test_parse_mark_score_keeps_extra_equals() {
        // Only the first '=' splits; the rest belongs to the score and fails
        assert!(parse_mark("math=8=5").is_err());
    }
}
