use chrono::Utc;
use clap::Subcommand;
use kora_core::Event;

use super::{apply, open, print_json, progress_store};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Print the progress record as JSON
    Show,
    /// Award star shards
    Award {
        /// Number of shards (must be positive)
        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
    /// Record one completed focus interval
    Focus {
        /// Interval length in minutes
        #[arg(default_value = "25", allow_hyphen_values = true)]
        minutes: i64,
    },
    /// Move the stability gauge (clamped to 0..=100)
    Stability {
        /// Signed change, e.g. -15
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Discard all progress
    Reset,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, db) = open()?;
    let store = progress_store(&config, db);

    match action {
        ProgressAction::Show => {
            let record = store.load_at(Utc::now());
            print_json(&record)?;
        }
        ProgressAction::Award { amount } => {
            apply(&store, |s, r| s.award_points(r, amount))?;
        }
        ProgressAction::Focus { minutes } => {
            apply(&store, |s, r| s.record_focus_completion(r, minutes))?;
        }
        ProgressAction::Stability { delta } => {
            apply(&store, |s, r| Ok(s.adjust_stability(r, delta)))?;
        }
        ProgressAction::Reset => {
            store.reset()?;
            print_json(&Event::ProgressReset { at: Utc::now() })?;
        }
    }
    Ok(())
}
