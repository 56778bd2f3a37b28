pub mod config;
pub mod cycle;
pub mod journal;
pub mod journey;
pub mod progress;
pub mod quest;
pub mod settings;

use kora_core::{Config, Database, Event, ProgressRecord, ProgressStore, SkillCatalog};
use serde::Serialize;

/// Record after a mutation plus what changed.
#[derive(Serialize)]
pub struct Outcome<'a> {
    pub record: &'a ProgressRecord,
    pub events: Vec<Event>,
}

/// Open the data-directory database with the configured keys and policy.
pub fn open() -> Result<(Config, Database), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    Ok((config, db))
}

pub fn progress_store(config: &Config, db: Database) -> ProgressStore<Database> {
    ProgressStore::new(db, SkillCatalog::default(), config)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run one load, transform, persist cycle and print the outcome.
pub fn apply<F>(store: &ProgressStore<Database>, transform: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&ProgressStore<Database>, &ProgressRecord) -> kora_core::Result<ProgressRecord>,
{
    let now = chrono::Utc::now();
    let before = store.try_load_at(now)?;
    let after = store.update(now, transform)?;
    let events = Event::between(&before, &after, store.catalog(), now);
    tracing::debug!(events = events.len(), "progress updated");
    print_json(&Outcome {
        record: &after,
        events,
    })
}
