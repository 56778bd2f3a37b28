//! User progress: the persisted record, the journey catalog it is read
//! against, the derived cycle day, and the store that ties them together.

pub mod catalog;
pub mod cycle;
pub mod record;
mod store;

pub use catalog::{NodeCategory, NodeState, NodeStatus, SkillCatalog, SkillNode};
pub use cycle::{cycle_day, CyclePhase, CYCLE_LENGTH_DAYS};
pub use record::{parse_anchor_date, ProgressRecord, MAX_STABILITY};
pub use store::ProgressStore;
