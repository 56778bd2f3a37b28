use chrono::Utc;
use clap::Subcommand;
use kora_core::{EntryKind, Journal, JournalEntry};

use super::{open, print_json};

#[derive(Subcommand)]
pub enum JournalAction {
    /// List entries, newest first
    List {
        /// Only entries of this kind (text, voice, drawing)
        #[arg(long)]
        kind: Option<String>,
    },
    /// Add an entry
    Add {
        /// Entry text, or a data URL for voice/drawing
        content: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "text")]
        kind: String,
    },
    /// Delete an entry by id
    Delete {
        id: String,
    },
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, db) = open()?;
    let key = &config.storage.journal_key;
    let mut journal = Journal::load(&db, key);

    match action {
        JournalAction::List { kind } => {
            let entries: Vec<&JournalEntry> = match kind {
                Some(kind) => journal.filter(kind.parse::<EntryKind>()?).collect(),
                None => journal.entries().iter().collect(),
            };
            print_json(&entries)?;
        }
        JournalAction::Add {
            content,
            title,
            kind,
        } => {
            let kind = kind.parse::<EntryKind>()?;
            let entry = journal
                .add(kind, &content, title.as_deref(), Utc::now())?
                .clone();
            journal.save(&db, key)?;
            print_json(&entry)?;
        }
        JournalAction::Delete { id } => {
            let removed = journal.delete(&id)?;
            journal.save(&db, key)?;
            print_json(&removed)?;
        }
    }
    Ok(())
}
