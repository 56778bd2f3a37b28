use clap::Subcommand;
use kora_core::UserSettings;

use super::{open, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting (e.g. "textSize", "colorblindMode")
    Get {
        field: String,
    },
    /// Set a setting
    Set {
        field: String,
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, db) = open()?;
    let key = &config.storage.settings_key;

    match action {
        SettingsAction::Get { field } => {
            let settings = UserSettings::load(&db, key);
            let value = settings
                .get(&field)
                .ok_or_else(|| format!("unknown setting: {field}"))?;
            println!("{value}");
        }
        SettingsAction::Set { field, value } => {
            let mut settings = UserSettings::load(&db, key);
            settings.set(&field, &value)?;
            settings.save(&db, key)?;
            println!("ok");
        }
        SettingsAction::List => {
            print_json(&UserSettings::load(&db, key))?;
        }
        SettingsAction::Reset => {
            UserSettings::default().save(&db, key)?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
