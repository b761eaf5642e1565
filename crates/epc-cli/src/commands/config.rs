//! Engine configuration: `decay`, `decay.sleep`, `rules` and `history`.

use clap::Subcommand;
use epc_core::Config;

use super::CmdResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key
    Get {
        /// e.g. decay.base_rate_per_hour, decay.sleep.start_hour,
        /// rules.saturation_threshold, history.retention_days
        key: String,
    },
    /// Change one value and save it; rejected values leave the file untouched
    Set {
        /// Dotted key, as for `get`
        key: String,
        /// New value, parsed as the key's current type
        value: String,
    },
    /// Print the whole configuration as TOML
    List,
    /// Restore the default rates, thresholds and sleep window
    Reset,
}

/// Every dotted leaf key of the configuration tree.
fn leaf_keys(config: &Config) -> Vec<String> {
    fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(map) => {
                for (name, child) in map {
                    let path = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{prefix}.{name}")
                    };
                    walk(&path, child, out);
                }
            }
            _ => out.push(prefix.to_string()),
        }
    }

    let mut keys = Vec::new();
    if let Ok(tree) = serde_json::to_value(config) {
        walk("", &tree, &mut keys);
    }
    keys
}

fn unknown_key(config: &Config, key: &str) -> Box<dyn std::error::Error> {
    format!(
        "unknown key: {key} (valid keys: {})",
        leaf_keys(config).join(", ")
    )
    .into()
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            // Sections are not values; only leaves can be printed.
            match config.get(&key).filter(|_| leaf_keys(&config).contains(&key)) {
                Some(value) => println!("{value}"),
                None => return Err(unknown_key(&config, &key)),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            if !leaf_keys(&config).contains(&key) {
                return Err(unknown_key(&config, &key));
            }
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
