//! The persisted progress record.
//!
//! Fields are private: every change goes through [`super::ProgressStore`],
//! which returns a new record rather than mutating a shared one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::catalog::SkillCatalog;
use super::cycle::cycle_day;

/// Upper bound of the stability gauge.
pub const MAX_STABILITY: u8 = 100;

/// A user's cumulative progress.
///
/// Serialized field names match the client's stored JSON
/// (`starShards`, `focusMinutes`, `cycleDay`, `lastPeriodDate`,
/// `completedNodeIds`, `stabilityCharge`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(rename = "starShards", default)]
    pub(crate) points: u64,
    #[serde(rename = "focusMinutes", default)]
    pub(crate) focus_minutes: u64,
    #[serde(rename = "cycleDay", default = "default_cycle_day")]
    pub(crate) cycle_day: u8,
    #[serde(rename = "lastPeriodDate", default, with = "anchor_date")]
    pub(crate) cycle_anchor: Option<DateTime<Utc>>,
    #[serde(rename = "completedNodeIds", default)]
    pub(crate) completed_node_ids: Vec<String>,
    #[serde(
        rename = "stabilityCharge",
        default = "default_stability",
        deserialize_with = "clamped_charge"
    )]
    pub(crate) stability_charge: u8,
}

fn default_cycle_day() -> u8 {
    1
}

fn default_stability() -> u8 {
    MAX_STABILITY
}

fn clamped_charge<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round().clamp(0.0, f64::from(MAX_STABILITY)) as u8)
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            points: 0,
            focus_minutes: 0,
            cycle_day: default_cycle_day(),
            cycle_anchor: None,
            completed_node_ids: Vec::new(),
            stability_charge: MAX_STABILITY,
        }
    }
}

impl ProgressRecord {
    /// Star shards earned so far.
    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn focus_minutes(&self) -> u64 {
        self.focus_minutes
    }

    pub fn stability_charge(&self) -> u8 {
        self.stability_charge
    }

    pub fn cycle_anchor(&self) -> Option<DateTime<Utc>> {
        self.cycle_anchor
    }

    /// Last derived cycle day. Recompute before display.
    pub fn cycle_day(&self) -> u8 {
        self.cycle_day
    }

    /// Completed journey node ids, in completion order.
    pub fn completed_node_ids(&self) -> &[String] {
        &self.completed_node_ids
    }

    pub fn is_completed(&self, node_id: &str) -> bool {
        self.completed_node_ids.iter().any(|id| id == node_id)
    }

    /// Re-establish invariants on a record read from storage.
    ///
    /// Unknown and duplicate node ids are dropped and the completed set is
    /// cut back to the longest unbroken prefix of the chain. `cycle_day` is
    /// reset to 1 without an anchor and kept in `1..=28` otherwise.
    pub(crate) fn normalized(mut self, catalog: &SkillCatalog) -> Self {
        let before = self.completed_node_ids.len();

        let mut seen: Vec<String> = Vec::with_capacity(before);
        for id in self.completed_node_ids.drain(..) {
            if catalog.contains(&id) && !seen.contains(&id) {
                seen.push(id);
            }
        }
        let prefix = catalog.completed_prefix_len(&seen);
        let allowed: Vec<&str> = catalog.iter().take(prefix).map(|n| n.id.as_str()).collect();
        seen.retain(|id| allowed.contains(&id.as_str()));
        self.completed_node_ids = seen;

        if self.completed_node_ids.len() != before {
            tracing::warn!(
                kept = self.completed_node_ids.len(),
                dropped = before - self.completed_node_ids.len(),
                "discarded node ids that break the journey chain"
            );
        }

        self.stability_charge = self.stability_charge.min(MAX_STABILITY);
        self.cycle_day = match self.cycle_anchor {
            None => default_cycle_day(),
            Some(_) => self.cycle_day.clamp(1, 28),
        };
        self
    }

    /// Copy of `self` with `cycle_day` derived from the anchor at `now`.
    pub(crate) fn with_cycle_day_at(mut self, now: DateTime<Utc>) -> Self {
        self.cycle_day = match self.cycle_anchor {
            Some(anchor) => cycle_day(anchor, now),
            None => default_cycle_day(),
        };
        self
    }
}

/// `lastPeriodDate` is `""` when unset, RFC 3339 otherwise. Plain
/// `YYYY-MM-DD` dates are accepted on read as midnight UTC.
mod anchor_date {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<Option<DateTime<Utc>>, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Some(naive.and_utc()))
            .ok_or_else(|| format!("invalid date '{raw}', expected RFC 3339 or YYYY-MM-DD"))
    }
}

pub use anchor_date::parse as parse_anchor_date;
