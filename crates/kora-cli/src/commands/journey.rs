use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;

use super::{apply, open, print_json, progress_store};

#[derive(Subcommand)]
pub enum JourneyAction {
    /// List every node with its status
    List,
    /// Show the node to complete next
    Next,
    /// Complete a node (must be the next available one)
    Complete {
        /// Node id, e.g. "adhd-1"
        id: String,
    },
}

#[derive(Serialize)]
struct Summary<'a> {
    completed: usize,
    total: usize,
    fraction: f64,
    nodes: Vec<kora_core::NodeState<'a>>,
}

pub fn run(action: JourneyAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, db) = open()?;
    let store = progress_store(&config, db);

    match action {
        JourneyAction::List => {
            let record = store.load_at(Utc::now());
            let catalog = store.catalog();
            print_json(&Summary {
                completed: record.completed_node_ids().len(),
                total: catalog.len(),
                fraction: catalog.progress_fraction(&record),
                nodes: catalog.statuses(&record),
            })?;
        }
        JourneyAction::Next => {
            let record = store.load();
            match store.catalog().next_available(&record) {
                Some(node) => print_json(node)?,
                None => println!("null"),
            }
        }
        JourneyAction::Complete { id } => {
            apply(&store, |s, r| s.complete_node(r, &id))?;
        }
    }
    Ok(())
}
