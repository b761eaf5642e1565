pub mod activity;
pub mod config;
pub mod history;
pub mod onboard;
pub mod reset;
pub mod status;
pub mod tool;

use epc_core::{Config, Database, EpcEngine, SleepWindow, StoredActivityOracle};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Engine wired to the on-disk database and config.
pub type DiskEngine<'a> = EpcEngine<&'a Database, StoredActivityOracle<&'a Database>>;

/// Open database and config for one command invocation.
pub struct Session {
    db: Database,
    config: Config,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            db: Database::open()?,
            config: Config::load()?,
        })
    }

    pub fn engine(&self) -> DiskEngine<'_> {
        let sleep = SleepWindow::from_config(
            &self.config.decay.sleep,
            self.config.decay.timezone_offset_hours,
        );
        EpcEngine::new(
            &self.db,
            StoredActivityOracle::new(&self.db, sleep),
            self.config.clone(),
        )
    }
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
