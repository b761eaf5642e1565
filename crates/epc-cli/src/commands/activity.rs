use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use epc_core::time::local_naive;
use epc_core::DailyActivity;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Record today's activity reading
    Set {
        #[arg(long)]
        steps: u32,
        #[arg(long, default_value_t = 0)]
        active_minutes: u32,
        #[arg(long, default_value_t = 0)]
        exercise_minutes: u32,
        /// Reading date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show today's activity reading
    Show {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ActivityAction) -> CmdResult {
    let session = Session::open()?;
    let engine = session.engine();
    let now = Utc::now();

    match action {
        ActivityAction::Set {
            steps,
            active_minutes,
            exercise_minutes,
            date,
        } => {
            let date = date.unwrap_or_else(|| {
                local_naive(now, engine.config().decay.timezone_offset_hours).date()
            });
            engine.record_activity(&DailyActivity {
                date,
                steps,
                active_minutes,
                exercise_minutes,
            })?;
            println!("Recorded {steps} steps for {date}");
        }
        ActivityAction::Show { json } => {
            let today = engine.today_activity_at(now)?;
            if json {
                return print_json(&today);
            }
            match today {
                Some(a) => println!(
                    "{}: {} steps, {} active min, {} exercise min",
                    a.date, a.steps, a.active_minutes, a.exercise_minutes
                ),
                None => println!("No activity recorded today"),
            }
        }
    }
    Ok(())
}
