//! CLI command definitions.

use clap::{Args, Subcommand, ValueEnum};

use crate::config::SelectionConfig;
use crate::error::Result;
use crate::selection::{parse_month, CarrierFilter, DayOfMonth, Selection};

/// Selection flags shared by the query commands.
///
/// Anything left out falls back to the configured default selection.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Month name or number (e.g. "January", "jan", "1")
    #[arg(long)]
    pub month: Option<String>,

    /// Day of month, 1-31
    #[arg(long)]
    pub day: Option<u32>,

    /// Carrier code, or "all" for every carrier
    #[arg(long)]
    pub carrier: Option<String>,
}

impl SelectionArgs {
    /// Merge with `defaults` and validate.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown month, out-of-range day or empty carrier.
    pub fn resolve(&self, defaults: &SelectionConfig) -> Result<Selection> {
        let month = parse_month(self.month.as_deref().unwrap_or(&defaults.month))?;
        let day = DayOfMonth::new(self.day.unwrap_or(defaults.day))?;
        let carrier: CarrierFilter = self
            .carrier
            .as_deref()
            .unwrap_or(&defaults.carrier)
            .parse()?;
        Ok(Selection::new(month, day, carrier))
    }
}

/// Report command arguments: all four result sets.
#[derive(Debug, Args)]
pub struct ReportCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Number of top destinations (defaults to query.top_destinations)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the per-day slice commands (`hours`, `proportions`).
#[derive(Debug, Args)]
pub struct SliceCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Monthly trend arguments. Only the carrier applies.
#[derive(Debug, Args)]
pub struct MonthlyCommand {
    /// Carrier code, or "all" for every carrier
    #[arg(long)]
    pub carrier: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Top destinations arguments. The day does not apply.
#[derive(Debug, Args)]
pub struct DestinationsCommand {
    /// Month name or number
    #[arg(long)]
    pub month: Option<String>,

    /// Carrier code, or "all" for every carrier
    #[arg(long)]
    pub carrier: Option<String>,

    /// Number of destinations (defaults to query.top_destinations)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Choices command arguments.
#[derive(Debug, Args)]
pub struct ChoicesCommand {
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
}

/// Output format for query commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// JSON output
    Json,
}
