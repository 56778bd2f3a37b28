use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::{NodeStatus, ProgressRecord, SkillCatalog};

/// Observable change to a user's progress.
/// Surfaces print these after a mutation instead of diffing records themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PointsAwarded {
        amount: u64,
        total: u64,
        at: DateTime<Utc>,
    },
    FocusRecorded {
        minutes: u64,
        total_minutes: u64,
        at: DateTime<Utc>,
    },
    NodeCompleted {
        node_id: String,
        at: DateTime<Utc>,
    },
    /// A node moved from locked to available.
    NodeUnlocked {
        node_id: String,
        at: DateTime<Utc>,
    },
    StabilityChanged {
        from: u8,
        to: u8,
        at: DateTime<Utc>,
    },
    CycleDayChanged {
        from: u8,
        to: u8,
        at: DateTime<Utc>,
    },
    ProgressReset {
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Events explaining how `before` became `after`.
    pub fn between(
        before: &ProgressRecord,
        after: &ProgressRecord,
        catalog: &SkillCatalog,
        at: DateTime<Utc>,
    ) -> Vec<Event> {
        let mut events = Vec::new();

        if after.focus_minutes() > before.focus_minutes() {
            events.push(Event::FocusRecorded {
                minutes: after.focus_minutes() - before.focus_minutes(),
                total_minutes: after.focus_minutes(),
                at,
            });
        }

        for id in after.completed_node_ids() {
            if !before.is_completed(id) {
                events.push(Event::NodeCompleted {
                    node_id: id.clone(),
                    at,
                });
            }
        }

        for node in catalog.iter() {
            let was = catalog.status(&node.id, before.completed_node_ids());
            let now = catalog.status(&node.id, after.completed_node_ids());
            if was == NodeStatus::Locked && now == NodeStatus::Available {
                events.push(Event::NodeUnlocked {
                    node_id: node.id.clone(),
                    at,
                });
            }
        }

        if after.points() > before.points() {
            events.push(Event::PointsAwarded {
                amount: after.points() - before.points(),
                total: after.points(),
                at,
            });
        }

        if after.stability_charge() != before.stability_charge() {
            events.push(Event::StabilityChanged {
                from: before.stability_charge(),
                to: after.stability_charge(),
                at,
            });
        }

        if after.cycle_day() != before.cycle_day() {
            events.push(Event::CycleDayChanged {
                from: before.cycle_day(),
                to: after.cycle_day(),
                at,
            });
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressStore;
    use crate::storage::MemoryStore;

    #[test]
    fn completing_first_node_unlocks_second() {
        let store = ProgressStore::with_defaults(MemoryStore::new());
        let at = Utc::now();
        let before = store.load();
        let after = store.complete_node(&before, "adhd-1").unwrap();

        let events = Event::between(&before, &after, store.catalog(), at);
        assert_eq!(
            events,
            vec![
                Event::NodeCompleted { node_id: "adhd-1".into(), at },
                Event::NodeUnlocked { node_id: "adhd-2".into(), at },
                Event::PointsAwarded { amount: 25, total: 25, at },
            ]
        );
    }

    #[test]
    fn unchanged_record_has_no_events() {
        let store = ProgressStore::with_defaults(MemoryStore::new());
        let record = store.load();
        assert!(Event::between(&record, &record, store.catalog(), Utc::now()).is_empty());
    }

    #[test]
    fn stability_event_serializes_with_type_tag() {
        let store = ProgressStore::with_defaults(MemoryStore::new());
        let before = store.load();
        let after = store.adjust_stability(&before, -30);
        let events = Event::between(&before, &after, store.catalog(), Utc::now());
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "StabilityChanged");
        assert_eq!(json["from"], 100);
        assert_eq!(json["to"], 70);
    }
}
