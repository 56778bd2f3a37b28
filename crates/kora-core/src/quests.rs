//! Daily quest checklist.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::storage::{load_document, save_document, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// Ordered quest list. Stored as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestLog {
    quests: Vec<Quest>,
}

impl Default for QuestLog {
    /// The starter checklist shown on first launch.
    fn default() -> Self {
        let starter = [
            (1, "Open the app and check in", true),
            (2, "Drink a glass of water", false),
            (3, "Set a single priority task", false),
        ];
        Self {
            quests: starter
                .into_iter()
                .map(|(id, text, completed)| Quest {
                    id,
                    text: text.to_string(),
                    completed,
                })
                .collect(),
        }
    }
}

impl QuestLog {
    pub fn empty() -> Self {
        Self { quests: Vec::new() }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Self {
        load_document(store, key)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S, key: &str) -> Result<()> {
        save_document(store, key, self)?;
        Ok(())
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn completed_count(&self) -> usize {
        self.quests.iter().filter(|q| q.completed).count()
    }

    /// Append a quest and return its id.
    ///
    /// # Errors
    /// [`CoreError::InvalidArgument`] for blank text, or when the largest
    /// stored id leaves no room for another.
    pub fn add(&mut self, text: &str) -> Result<u64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::invalid("text", "quest text must not be blank"));
        }
        let id = self
            .quests
            .iter()
            .map(|q| q.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| CoreError::invalid("id", "quest ids exhausted"))?;
        self.quests.push(Quest {
            id,
            text: text.to_string(),
            completed: false,
        });
        Ok(id)
    }

    /// Flip completion and return the new state.
    pub fn toggle(&mut self, id: u64) -> Result<bool> {
        let quest = self
            .quests
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| CoreError::not_found("quest", id.to_string()))?;
        quest.completed = !quest.completed;
        Ok(quest.completed)
    }

    pub fn remove(&mut self, id: u64) -> Result<Quest> {
        let pos = self
            .quests
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| CoreError::not_found("quest", id.to_string()))?;
        Ok(self.quests.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn starter_quests() {
        let log = QuestLog::default();
        assert_eq!(log.quests().len(), 3);
        assert_eq!(log.completed_count(), 1);
    }

    #[test]
    fn add_assigns_next_id_and_trims() {
        let mut log = QuestLog::default();
        let id = log.add("  Stretch for two minutes ").unwrap();
        assert_eq!(id, 4);
        assert_eq!(log.quests()[3].text, "Stretch for two minutes");
        assert!(!log.quests()[3].completed);
    }

    #[test]
    fn add_rejects_blank() {
        let mut log = QuestLog::empty();
        assert!(matches!(log.add("   "), Err(CoreError::InvalidArgument { .. })));
        assert!(log.quests().is_empty());
    }

    #[test]
    fn toggle_and_remove() {
        let mut log = QuestLog::default();
        assert!(log.toggle(2).unwrap());
        assert!(!log.toggle(2).unwrap());
        let removed = log.remove(1).unwrap();
        assert_eq!(removed.text, "Open the app and check in");
        assert!(matches!(log.toggle(1), Err(CoreError::NotFound { .. })));
        assert!(matches!(log.remove(99), Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn stored_as_plain_array() {
        let store = MemoryStore::new();
        let mut log = QuestLog::empty();
        log.add("Water the plants").unwrap();
        log.save(&store, "quests").unwrap();
        let raw = store.get("quests").unwrap().unwrap();
        assert_eq!(raw, r#"[{"id":1,"text":"Water the plants","completed":false}]"#);
        assert_eq!(QuestLog::load(&store, "quests"), log);
    }

    #[test]
    fn reads_millisecond_ids() {
        let store = MemoryStore::new();
        store
            .set("quests", r#"[{"id":1760000000000,"text":"Walk","completed":true}]"#)
            .unwrap();
        let mut log = QuestLog::load(&store, "quests");
        assert_eq!(log.add("Next").unwrap(), 1_760_000_000_001);
    }

    #[test]
    fn add_after_max_id_is_rejected() {
        let store = MemoryStore::new();
        let raw = format!(r#"[{{"id":{},"text":"Last","completed":false}}]"#, u64::MAX);
        store.set("quests", &raw).unwrap();
        let mut log = QuestLog::load(&store, "quests");
        assert!(matches!(log.add("next"), Err(CoreError::InvalidArgument { .. })));
        assert_eq!(log.quests().len(), 1);
    }
}
