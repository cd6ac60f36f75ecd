//! `flight-delays` - CLI over the delay-cause query layer
//!
//! Loads the dataset once, resolves the selection against the configured
//! defaults and prints the requested result sets.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use clap::Parser;

use flight_delays::cli::output::{
    delay_hours_title, destinations_title, monthly_title, proportions_title, render_delay_hours,
    render_destinations, render_monthly, render_proportions, render_report,
};
use flight_delays::cli::{
    ChoicesCommand, Cli, Command, ConfigCommand, DestinationsCommand, MonthlyCommand,
    OutputFormat, ReportCommand, SliceCommand,
};
use flight_delays::selection::{months, parse_month, DayOfMonth, ALL_CARRIERS_LABEL};
use flight_delays::{
    dashboard, delay_hours_by_type, delay_type_proportions, init_logging, monthly_occurrences,
    top_destinations, CarrierFilter, Config, Dataset, Result,
};

type CliResult = Result<()>;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone())?;
    if let Some(path) = cli.data.clone() {
        config.data.path = path;
    }

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd)?,
        command => run_query(&config, command)?,
    }
    Ok(())
}

fn run_query(config: &Config, command: Command) -> CliResult {
    let dataset = Dataset::open(&config.data.path, &config.data)?;

    match command {
        Command::Report(cmd) => handle_report(&dataset, config, &cmd),
        Command::Hours(cmd) => handle_hours(&dataset, config, &cmd),
        Command::Proportions(cmd) => handle_proportions(&dataset, config, &cmd),
        Command::Monthly(cmd) => handle_monthly(&dataset, config, &cmd),
        Command::Destinations(cmd) => handle_destinations(&dataset, config, &cmd),
        Command::Choices(cmd) => handle_choices(&dataset, &cmd),
        Command::Config(cmd) => handle_config(config, cmd),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_table(rendered: &str) -> CliResult {
    let mut out = io::stdout().lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn handle_report(dataset: &Dataset, config: &Config, cmd: &ReportCommand) -> CliResult {
    let selection = cmd.selection.resolve(&config.selection)?;
    let limit = cmd.limit.unwrap_or(config.query.top_destinations);
    let report = dashboard(dataset, &selection, limit)?;

    match cmd.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => print_table(&render_report(&selection, &report, limit)),
    }
}

fn handle_hours(dataset: &Dataset, config: &Config, cmd: &SliceCommand) -> CliResult {
    let selection = cmd.selection.resolve(&config.selection)?;
    let hours = delay_hours_by_type(dataset, selection.month, selection.day, &selection.carrier)?;

    match cmd.format {
        OutputFormat::Json => print_json(&hours),
        OutputFormat::Table => {
            print_table(&render_delay_hours(&delay_hours_title(&selection), &hours))
        }
    }
}

fn handle_proportions(dataset: &Dataset, config: &Config, cmd: &SliceCommand) -> CliResult {
    let selection = cmd.selection.resolve(&config.selection)?;
    let proportions =
        delay_type_proportions(dataset, selection.month, selection.day, &selection.carrier)?;

    match cmd.format {
        OutputFormat::Json => print_json(&proportions),
        OutputFormat::Table => {
            print_table(&render_proportions(&proportions_title(&selection), &proportions))
        }
    }
}

fn handle_monthly(dataset: &Dataset, config: &Config, cmd: &MonthlyCommand) -> CliResult {
    let carrier: CarrierFilter = cmd
        .carrier
        .as_deref()
        .unwrap_or(&config.selection.carrier)
        .parse()?;
    let months = monthly_occurrences(dataset, &carrier)?;

    match cmd.format {
        OutputFormat::Json => print_json(&months),
        OutputFormat::Table => print_table(&render_monthly(&monthly_title(carrier.label()), &months)),
    }
}

fn handle_destinations(dataset: &Dataset, config: &Config, cmd: &DestinationsCommand) -> CliResult {
    let month = parse_month(cmd.month.as_deref().unwrap_or(&config.selection.month))?;
    let carrier: CarrierFilter = cmd
        .carrier
        .as_deref()
        .unwrap_or(&config.selection.carrier)
        .parse()?;
    let limit = cmd.limit.unwrap_or(config.query.top_destinations);
    let destinations = top_destinations(dataset, month, &carrier, limit)?;

    match cmd.format {
        OutputFormat::Json => print_json(&destinations),
        OutputFormat::Table => {
            let title = destinations_title(limit, carrier.label(), month.name());
            print_table(&render_destinations(&title, &destinations))
        }
    }
}

fn handle_choices(dataset: &Dataset, cmd: &ChoicesCommand) -> CliResult {
    let month_names: Vec<&str> = months().map(|m| m.name()).collect();
    let days: Vec<u32> = DayOfMonth::all().map(DayOfMonth::get).collect();
    let mut carriers = vec![ALL_CARRIERS_LABEL.to_string()];
    carriers.extend(dataset.carriers().iter().cloned());

    if cmd.json {
        return print_json(&serde_json::json!({
            "months": month_names,
            "days": days,
            "carriers": carriers,
        }));
    }

    println!("Months:   {}", month_names.join(", "));
    println!("Days:     1-{}", days.len());
    println!("Carriers: {}", carriers.join(", "));
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                return print_json(config);
            }
            println!("Current Configuration");
            println!("=====================");
            println!();
            println!("[Data]");
            println!("  Path:               {}", config.data.path.display());
            println!("  Batch size:         {}", config.data.batch_size);
            println!("  Null values:        {:?}", config.data.null_values);
            println!();
            println!("[Query]");
            println!("  Top destinations:   {}", config.query.top_destinations);
            println!();
            println!("[Selection]");
            println!("  Month:              {}", config.selection.month);
            println!("  Day:                {}", config.selection.day);
            println!("  Carrier:            {}", config.selection.carrier);
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
    }
    Ok(())
}
