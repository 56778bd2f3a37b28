//! # Orbital Kora Core Library
//!
//! Client-side state for the Orbital Kora wellness app. Every screen of
//! the app reads and writes the same small documents through a key-value
//! backend; this crate owns those documents and the rules that govern them.
//!
//! ## Architecture
//!
//! - **Progress**: the star-shard/focus/stability record, the linear journey
//!   catalog it unlocks, and the cycle day derived from an anchor date.
//!   Transforms are pure (`record in -> record out`); persistence is explicit.
//! - **Storage**: the [`KeyValueStore`] trait with SQLite and in-memory
//!   backends, plus TOML-based configuration of reward policy and keys.
//! - **Side documents**: settings, daily quests and journal entries.
//!
//! ## Key Components
//!
//! - [`ProgressStore`]: load, transform, persist the progress record
//! - [`SkillCatalog`]: ordered journey nodes and reachability
//! - [`Database`]: SQLite key-value backend
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod journal;
pub mod progress;
pub mod quests;
pub mod settings;
pub mod storage;

pub use error::{ConfigError, CoreError, Result, StoreError};
pub use events::Event;
pub use journal::{EntryKind, Journal, JournalEntry};
pub use progress::{
    cycle_day, CyclePhase, NodeCategory, NodeState, NodeStatus, ProgressRecord, ProgressStore,
    SkillCatalog, SkillNode,
};
pub use quests::{Quest, QuestLog};
pub use settings::{ColorblindMode, TextSize, UserSettings};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
