use clap::{Parser, Subcommand};
use crate::cli::error::{user_error, validate_builder_name};
use crate::cli::output::{
    format_grid_json, format_grid_lines, format_oracle_status, format_oracle_status_json,
    format_summary_json, format_summary_table,
};
use crate::config::Config;
use crate::grid::{parse_tgrid_page, StatusGrid};
use crate::oracle::{plan_clean, record_step_outcome, BuildStatusOracle, StepOutcome};
use anyhow::{Context, Result};
use log::debug;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "buildwatch")]
#[command(about = "Build status tracking for buildbot masters")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory holding the per-builder failure flags (overrides ~/.buildwatch/rc)
    #[arg(long = "work-dir", global = true)]
    pub work_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show whether the last build of a builder succeeded
    Status {
        /// Builder name
        builder: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Mark the last build of a builder as failed
    Fail {
        /// Builder name
        builder: String,
    },
    /// Forget a recorded failure
    Forget {
        /// Builder name
        builder: String,
    },
    /// Record the outcome of a finished build step
    Record {
        /// Builder name
        builder: String,
        /// Step outcome: success, warnings, failure, skipped, exception or retry
        outcome: String,
    },
    /// Decide how to clean the checkout before the next build
    Clean {
        /// Builder name
        builder: String,
        /// The builder is a try slave (never nuked)
        #[arg(long = "try-slave")]
        try_slave: bool,
    },
    /// Parse a tgrid page into revision/bot build statuses
    Parse {
        /// Page to parse (reads stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the latest build of every bot on a tgrid page
    Summary {
        /// Page to parse (reads stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.work_dir.as_deref())?;
    debug!("Using work directory {}", config.work_dir.display());

    match cli.command {
        Commands::Status { builder, json } => {
            let oracle = open_oracle(&config, &builder);
            if json {
                println!("{}", format_oracle_status_json(&oracle)?);
            } else {
                println!("{}", format_oracle_status(&oracle));
            }
            Ok(())
        }
        Commands::Fail { builder } => {
            let oracle = open_oracle(&config, &builder);
            oracle.set_last_build_as_failed()
                .with_context(|| format!("Failed to write flag file: {}", oracle.flag_path().display()))?;
            println!("Marked last build of '{}' as failed", builder);
            Ok(())
        }
        Commands::Forget { builder } => {
            let oracle = open_oracle(&config, &builder);
            let had_failure = !oracle.last_build_succeeded();
            oracle.forget_last_build()
                .with_context(|| format!("Failed to remove flag file: {}", oracle.flag_path().display()))?;
            if had_failure {
                println!("Forgot failed build of '{}'", builder);
            } else {
                println!("No failed build recorded for '{}'", builder);
            }
            Ok(())
        }
        Commands::Record { builder, outcome } => {
            let outcome: StepOutcome = match outcome.parse() {
                Ok(outcome) => outcome,
                Err(e) => user_error(&e),
            };
            let oracle = open_oracle(&config, &builder);
            let flagged = record_step_outcome(&oracle, outcome)
                .with_context(|| format!("Failed to write flag file: {}", oracle.flag_path().display()))?;
            if flagged {
                println!("Step failed; marked last build of '{}' as failed", builder);
            } else {
                println!("{}", format_oracle_status(&oracle));
            }
            Ok(())
        }
        Commands::Clean { builder, try_slave } => {
            let oracle = open_oracle(&config, &builder);
            let mode = plan_clean(&oracle, try_slave)
                .with_context(|| format!("Failed to remove flag file: {}", oracle.flag_path().display()))?;
            let mut line = format!("{}: {}", mode, mode.description().join(" "));
            if !mode.script_args().is_empty() {
                line.push_str(&format!(" [{}]", mode.script_args().join(" ")));
            }
            println!("{}", line);
            Ok(())
        }
        Commands::Parse { file, json } => {
            let grid = load_grid(file)?;
            if json {
                println!("{}", format_grid_json(&grid)?);
            } else {
                println!("{}", format_grid_lines(&grid));
            }
            Ok(())
        }
        Commands::Summary { file, json } => {
            let rows = load_grid(file)?.latest_per_bot();
            if json {
                println!("{}", format_summary_json(&rows)?);
            } else {
                println!("{}", format_summary_table(&rows));
            }
            Ok(())
        }
    }
}

fn open_oracle(config: &Config, builder: &str) -> BuildStatusOracle {
    if let Err(e) = validate_builder_name(builder) {
        user_error(&e);
    }
    BuildStatusOracle::new(builder, &config.work_dir)
}

fn load_grid(file: Option<PathBuf>) -> Result<StatusGrid> {
    let html = match file {
        Some(path) if path.as_os_str() != "-" => match std::fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) => user_error(&format!("Cannot read {}: {}", path.display(), e)),
        },
        _ => {
            let mut html = String::new();
            std::io::stdin()
                .read_to_string(&mut html)
                .context("Failed to read page from stdin")?;
            html
        }
    };

    match parse_tgrid_page(&html) {
        Ok(grid) => Ok(grid),
        Err(e) => user_error(&e.to_string()),
    }
}
