use clap::Subcommand;
use kora_core::QuestLog;

use super::{open, print_json};

#[derive(Subcommand)]
pub enum QuestAction {
    /// List quests
    List,
    /// Add a quest
    Add {
        /// Quest text
        text: String,
    },
    /// Toggle a quest's completion
    Toggle {
        id: u64,
    },
    /// Remove a quest
    Remove {
        id: u64,
    },
}

pub fn run(action: QuestAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, db) = open()?;
    let key = &config.storage.quests_key;
    let mut log = QuestLog::load(&db, key);

    match action {
        QuestAction::List => {
            print_json(log.quests())?;
            return Ok(());
        }
        QuestAction::Add { text } => {
            let id = log.add(&text)?;
            eprintln!("Quest added: {id}");
        }
        QuestAction::Toggle { id } => {
            let completed = log.toggle(id)?;
            eprintln!("Quest {id}: {}", if completed { "done" } else { "open" });
        }
        QuestAction::Remove { id } => {
            let removed = log.remove(id)?;
            eprintln!("Quest removed: {}", removed.text);
        }
    }

    log.save(&db, key)?;
    print_json(log.quests())
}
