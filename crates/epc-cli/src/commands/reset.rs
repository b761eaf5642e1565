use super::{CmdResult, Session};

pub fn run(yes: bool) -> CmdResult {
    if !yes {
        return Err("refusing to delete data without --yes".into());
    }
    let session = Session::open()?;
    session.engine().clear_all_data()?;
    println!("All EPC data cleared");
    Ok(())
}
