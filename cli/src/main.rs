//! upgov: replay governance scenarios against an upgradeable token.

mod scenario;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use upgov_token::TokenConfig;
use upgov_utils::{format_duration, format_remaining, init_logging, LogFormat};

use crate::scenario::{ReplayReport, Scenario};

#[derive(Parser)]
#[command(name = "upgov", about = "Upgradeable-token governance tools")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "warn", env = "UPGOV_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "UPGOV_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scenario script and print each step and the final state.
    Replay {
        /// Path to the scenario TOML file.
        scenario: PathBuf,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print a token configuration as TOML.
    Config {
        /// Validate and echo this file instead of printing the defaults.
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level);

    match cli.command {
        Command::Replay { scenario, json } => {
            let path = scenario.to_string_lossy();
            let report = Scenario::from_toml_file(&path)?.replay()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            let unexpected = report.unexpected();
            if unexpected > 0 {
                anyhow::bail!("{unexpected} step(s) did not match their expectation");
            }
        }
        Command::Config { path } => {
            let config = match path {
                Some(path) => TokenConfig::from_toml_file(&path.to_string_lossy())
                    .with_context(|| format!("loading {}", path.display()))?,
                None => TokenConfig::default(),
            };
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for step in &report.steps {
        let marker = if step.as_expected { " " } else { "!" };
        match &step.result {
            Ok(detail) => println!("{marker}[{:>3}] t={} {}: {detail}", step.index, step.time, step.action),
            Err(error) => println!(
                "{marker}[{:>3}] t={} {}: rejected: {error}",
                step.index, step.time, step.action
            ),
        }
    }

    let status = &report.status;
    let now = report.final_time;
    println!();
    println!("implementation:   {}", report.implementation);
    println!("epoch:            {}", status.epoch);
    println!("council:          {}", status.council);
    println!(
        "locked supply:    {} (minimum {})",
        status.locked_supply, status.min_locked_supply
    );
    match status.most_voted {
        Some(imp) => println!(
            "most voted:       {imp} with {} (quorum > {})",
            status.most_voted_votes, status.quorum_threshold
        ),
        None => println!("most voted:       none"),
    }
    println!("qualifies:        {}", status.qualifies);
    println!("delay:            {}", format_duration(report.delay_secs));
    for (track, schedule) in [
        ("voter body", status.voter_body_schedule),
        ("council", status.council_schedule),
    ] {
        if let Some(s) = schedule {
            println!(
                "{track:<10} track: {} at {} ({})",
                s.implementation,
                s.end_time,
                format_remaining(s.end_time, now)
            );
        }
    }
}
