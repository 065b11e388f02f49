// Output formatting for grid and oracle commands

use crate::grid::{BotSummary, StatusGrid};
use crate::oracle::{BuildStatusOracle, LastBuild};
use anyhow::Result;

/// One `key=value` line per grid entry, sorted by key
pub fn format_grid_lines(grid: &StatusGrid) -> String {
    grid.to_flat_map()
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flat mapping as a JSON object
pub fn format_grid_json(grid: &StatusGrid) -> Result<String> {
    Ok(serde_json::to_string_pretty(&grid.to_flat_map())?)
}

/// Table of the latest build per bot
pub fn format_summary_table(rows: &[BotSummary]) -> String {
    if rows.is_empty() {
        return "No builds found.".to_string();
    }

    let bot_width = rows
        .iter()
        .map(|row| row.bot.chars().count())
        .max()
        .unwrap_or(0)
        .max("Bot".len());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("{:<bot_width$} {:<10} {:<8} {:<8}", "Bot", "Revision", "Build", "Status"));
    lines.push("-".repeat(bot_width + 29));
    for row in rows {
        lines.push(format!(
            "{:<bot_width$} {:<10} {:<8} {:<8}",
            row.bot, row.revision, row.build_number, row.status
        ));
    }
    lines.join("\n")
}

pub fn format_summary_json(rows: &[BotSummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Human-readable oracle state, e.g. "Linux: last build failed"
pub fn format_oracle_status(oracle: &BuildStatusOracle) -> String {
    let state = match oracle.last_build() {
        LastBuild::Succeeded => "succeeded",
        LastBuild::Failed => "failed",
    };
    format!("{}: last build {}", oracle.builder_name(), state)
}

pub fn format_oracle_status_json(oracle: &BuildStatusOracle) -> Result<String> {
    let value = serde_json::json!({
        "builder": oracle.builder_name(),
        "last_build": oracle.last_build(),
        "flag_path": oracle.flag_path().display().to_string(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
