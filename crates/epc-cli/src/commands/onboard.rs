use clap::Subcommand;

use epc_core::{Assessment, EpcScores};

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum OnboardAction {
    /// Set scores directly (0-100 each)
    Scores {
        energy: f64,
        purpose: f64,
        connection: f64,
        #[arg(long)]
        json: bool,
    },
    /// Derive scores from 1-5 questionnaire answers
    Assess {
        /// Comma-separated energy answers, e.g. 4,3,5
        #[arg(long, value_delimiter = ',', required = true)]
        energy: Vec<u8>,
        #[arg(long, value_delimiter = ',', required = true)]
        purpose: Vec<u8>,
        #[arg(long, value_delimiter = ',', required = true)]
        connection: Vec<u8>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: OnboardAction) -> CmdResult {
    let session = Session::open()?;
    let engine = session.engine();

    let (scores, json) = match action {
        OnboardAction::Scores {
            energy,
            purpose,
            connection,
            json,
        } => (
            engine.initialize_scores(EpcScores::new(energy, purpose, connection)?)?,
            json,
        ),
        OnboardAction::Assess {
            energy,
            purpose,
            connection,
            json,
        } => {
            let assessment = Assessment {
                energy,
                purpose,
                connection,
            };
            (engine.onboard(&assessment)?, json)
        }
    };

    if json {
        return print_json(&scores);
    }
    println!(
        "Scores set: energy {} purpose {} connection {}",
        scores.energy, scores.purpose, scores.connection
    );
    println!("Burnout: {}%", engine.calculate_burnout(&scores)?);
    Ok(())
}
