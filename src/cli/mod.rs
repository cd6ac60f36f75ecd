//! Command-line interface for flight-delays.
//!
//! This module provides the CLI structure and text rendering for the
//! `flight-delays` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ChoicesCommand, ConfigCommand, DestinationsCommand, MonthlyCommand, OutputFormat,
    ReportCommand, SelectionArgs, SliceCommand,
};

/// flight-delays - Explore delay causes in a flight delay dataset
///
/// Loads a delay-cause table once and answers the four dashboard questions
/// for a chosen month, day and carrier.
#[derive(Debug, Parser)]
#[command(name = "flight-delays")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dataset file (CSV or Parquet); overrides data.path
    #[arg(short, long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
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
    /// All four result sets for one selection
    Report(ReportCommand),

    /// Total delay hours per delay type for a month, day and carrier
    Hours(SliceCommand),

    /// Share of each delay type for a month, day and carrier
    Proportions(SliceCommand),

    /// Delayed flights per month for a carrier, across the whole dataset
    Monthly(MonthlyCommand),

    /// Most frequent destinations for a month and carrier
    Destinations(DestinationsCommand),

    /// List the selectable months, days and carriers
    Choices(ChoicesCommand),

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
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
