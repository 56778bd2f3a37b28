use chrono::{DateTime, Utc};
use clap::Subcommand;
use kora_core::progress::parse_anchor_date;
use kora_core::CyclePhase;
use serde::Serialize;

use super::{apply, open, print_json, progress_store};

#[derive(Subcommand)]
pub enum CycleAction {
    /// Show today's cycle day and phase
    Show,
    /// Set the anchor date (YYYY-MM-DD or RFC 3339)
    Anchor {
        date: String,
    },
    /// Forget the anchor date
    Clear,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycleView {
    day: u8,
    anchor: Option<DateTime<Utc>>,
    phase: CyclePhase,
    phase_name: &'static str,
    guidance: &'static str,
}

pub fn run(action: CycleAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, db) = open()?;
    let store = progress_store(&config, db);

    match action {
        CycleAction::Show => {
            let record = store.load_at(Utc::now());
            let phase = CyclePhase::for_day(record.cycle_day());
            print_json(&CycleView {
                day: record.cycle_day(),
                anchor: record.cycle_anchor(),
                phase,
                phase_name: phase.name(),
                guidance: phase.guidance(),
            })?;
        }
        CycleAction::Anchor { date } => {
            let anchor = parse_anchor_date(&date)?
                .ok_or("anchor date must not be empty; use `kora cycle clear`")?;
            apply(&store, |s, r| s.set_cycle_anchor(r, anchor, Utc::now()))?;
        }
        CycleAction::Clear => {
            apply(&store, |s, r| Ok(s.clear_cycle_anchor(r)))?;
        }
    }
    Ok(())
}
