//! Tool status and completion.

use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;

use epc_core::{CooldownStatus, ToolId};

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum ToolAction {
    /// List every tool with its current effectiveness
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show cooldown status of one tool
    Status {
        /// Tool id, e.g. hydrationHero
        tool: String,
        #[arg(long)]
        json: bool,
    },
    /// Record a completed tool session
    Complete {
        /// Tool id, e.g. hydrationHero
        tool: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolRow {
    tool: ToolId,
    #[serde(flatten)]
    status: CooldownStatus,
}

fn describe(tool: ToolId, status: &CooldownStatus) -> String {
    let p = &status.effective_points;
    let mut line = format!(
        "{:<18} {:>3}%  E+{} P+{} C+{}",
        tool.as_str(),
        status.effectiveness_percentage,
        p.energy,
        p.purpose,
        p.connection
    );
    if status.is_on_cooldown {
        line.push_str(&format!("  (full in {}h)", status.cooldown_remaining));
    }
    line
}

pub fn run(action: ToolAction) -> CmdResult {
    let session = Session::open()?;
    let engine = session.engine();

    match action {
        ToolAction::List { json } => {
            let rows: Vec<ToolRow> = engine
                .all_tool_statuses_at(Utc::now())?
                .into_iter()
                .map(|(tool, status)| ToolRow { tool, status })
                .collect();
            if json {
                return print_json(&rows);
            }
            for row in &rows {
                println!("{}", describe(row.tool, &row.status));
            }
        }
        ToolAction::Status { tool, json } => {
            let tool: ToolId = tool.parse()?;
            let status = engine.get_tool_cooldown_status(tool)?;
            if json {
                return print_json(&ToolRow { tool, status });
            }
            println!("{}", describe(tool, &status));
        }
        ToolAction::Complete { tool, json } => {
            let tool: ToolId = tool.parse()?;
            let outcome = engine.complete_tool(tool)?;
            if json {
                return print_json(&outcome);
            }

            let a = &outcome.awarded.points;
            println!(
                "{tool} completed at {}% effectiveness: E+{} P+{} C+{}",
                outcome.cooldown.effectiveness_percentage, a.energy, a.purpose, a.connection
            );
            if outcome.awarded.saturation_applied {
                println!("  saturation dampened the award");
            }
            if outcome.awarded.amplifier_applied {
                println!("  low-state amplifier boosted the award");
            }
            let s = &outcome.new_scores;
            println!(
                "Scores: energy {} purpose {} connection {} (burnout {}%)",
                s.energy, s.purpose, s.connection, outcome.burnout
            );
            if let Some(buffer) = &outcome.buffer {
                println!(
                    "Energy buffer: decay x{} for {}h",
                    buffer.multiplier, buffer.duration_hours
                );
            }
            if let Some(tail) = &outcome.tail {
                println!(
                    "Tail: P+{} C+{} fading over {}h",
                    tail.initial_points.purpose, tail.initial_points.connection, tail.duration_hours
                );
            }
        }
    }
    Ok(())
}
