use super::{print_json, CmdResult, Session};

pub fn run(json: bool) -> CmdResult {
    let session = Session::open()?;
    let samples = session.engine().burnout_history()?;

    if json {
        return print_json(&samples);
    }
    if samples.is_empty() {
        println!("No burnout history yet");
        return Ok(());
    }
    for sample in &samples {
        let width = (sample.burnout as usize) / 5;
        println!("{}  {:>3}% {}", sample.hour, sample.burnout, "#".repeat(width));
    }
    Ok(())
}
