//! Score overview and the hourly check.

use chrono::{DateTime, Utc};
use serde::Serialize;

use epc_core::{BufferView, EpcScores, TailView};

use super::{print_json, CmdResult, Session};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    scores: Option<EpcScores>,
    burnout: Option<u8>,
    buffer: Option<BufferView>,
    tails: Vec<TailView>,
    next_decay_due: Option<DateTime<Utc>>,
}

fn bar(value: f64) -> String {
    let filled = (value / 5.0).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled.min(20)))
}

pub fn run(json: bool) -> CmdResult {
    let session = Session::open()?;
    let engine = session.engine();
    let now = Utc::now();

    let scores = engine.get_epc_scores()?;
    let report = StatusReport {
        burnout: engine.current_burnout()?,
        buffer: engine.active_buffer_at(now)?,
        tails: engine.active_tails_at(now)?,
        next_decay_due: engine.next_decay_due()?,
        scores,
    };

    if json {
        return print_json(&report);
    }

    let Some(scores) = report.scores else {
        println!("No scores yet. Run `epc onboard` first.");
        return Ok(());
    };

    println!("Energy      {} {:6.2}", bar(scores.energy), scores.energy);
    println!("Purpose     {} {:6.2}", bar(scores.purpose), scores.purpose);
    println!("Connection  {} {:6.2}", bar(scores.connection), scores.connection);
    if let Some(burnout) = report.burnout {
        println!("Burnout     {burnout}%");
    }

    if let Some(view) = &report.buffer {
        println!(
            "\nEnergy buffer from {}: decay x{} for {:.1}h more (until {})",
            view.buffer.source,
            view.buffer.multiplier,
            view.remaining_hours,
            view.expires_at.format("%H:%M UTC")
        );
    }
    for view in &report.tails {
        println!(
            "Tail from {}: P+{} C+{} fading over {:.1}h",
            view.tail.source, view.remaining_now.purpose, view.remaining_now.connection, view.hours_left
        );
    }
    if let Some(due) = report.next_decay_due {
        println!("\nNext decay due: {}", due.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

pub fn tick(json: bool) -> CmdResult {
    let session = Session::open()?;
    let report = session.engine().run_hourly_check()?;

    if json {
        return print_json(&report);
    }

    if report.decay.decay_applied {
        println!(
            "Energy -{:.2} -> {:.2}",
            report.decay.energy_lost, report.decay.new_energy
        );
    } else {
        println!("Energy decay not due");
    }
    if report.tails.tails_applied > 0 || report.tails.tails_expired > 0 {
        println!(
            "Tails: {} faded (P-{} C-{}), {} expired",
            report.tails.tails_applied,
            report.tails.total_points_faded.purpose,
            report.tails.total_points_faded.connection,
            report.tails.tails_expired
        );
    }
    Ok(())
}
