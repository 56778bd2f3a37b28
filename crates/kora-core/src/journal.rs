//! Journal entries: text notes plus references to captured voice and
//! drawing media. Capture itself happens in the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::storage::{load_document, save_document, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Text,
    Voice,
    Drawing,
}

impl std::str::FromStr for EntryKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(EntryKind::Text),
            "voice" => Ok(EntryKind::Voice),
            "drawing" => Ok(EntryKind::Drawing),
            other => Err(CoreError::invalid(
                "kind",
                format!("expected text, voice or drawing, got '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Text body, or a data URL for voice and drawing entries.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Entries, newest first. Stored as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Self {
        load_document(store, key)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S, key: &str) -> Result<()> {
        save_document(store, key, self)?;
        Ok(())
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind, newest first.
    pub fn filter(&self, kind: EntryKind) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Prepend a new entry and return it.
    ///
    /// # Errors
    /// [`CoreError::InvalidArgument`] when `content` is blank.
    pub fn add(
        &mut self,
        kind: EntryKind,
        content: &str,
        title: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<&JournalEntry> {
        if content.trim().is_empty() {
            return Err(CoreError::invalid("content", "journal entry is empty"));
        }
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: at.timestamp_millis(),
            kind,
            content: content.to_string(),
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        };
        tracing::debug!(id = %entry.id, ?kind, "journal entry added");
        self.entries.insert(0, entry);
        Ok(&self.entries[0])
    }

    pub fn delete(&mut self, id: &str) -> Result<JournalEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::not_found("journal entry", id))?;
        Ok(self.entries.remove(pos))
    }
}
