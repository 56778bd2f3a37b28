//! Cycle-day derivation and phase lookup.
//!
//! `cycleDay` is never stored as truth: it is always derived from the anchor
//! date and the current wall clock through [`cycle_day`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of the modelled cycle.
pub const CYCLE_LENGTH_DAYS: i64 = 28;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Day of the cycle, in `1..=28`, for `now` relative to `anchor`.
///
/// Whole days are floored, so an anchor later than `now` (clock skew, a
/// mistyped date) wraps backwards instead of leaving the range.
pub fn cycle_day(anchor: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    let days_since = (now - anchor).num_milliseconds().div_euclid(MILLIS_PER_DAY);
    (days_since.rem_euclid(CYCLE_LENGTH_DAYS) + 1) as u8
}

/// Coarse phase of the cycle, shown next to the day counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulatory,
    Luteal,
}

impl CyclePhase {
    pub fn for_day(day: u8) -> Self {
        match day {
            0..=5 => CyclePhase::Menstrual,
            6..=13 => CyclePhase::Follicular,
            14..=15 => CyclePhase::Ovulatory,
            _ => CyclePhase::Luteal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "Menstrual Orbit",
            CyclePhase::Follicular => "Follicular Orbit",
            CyclePhase::Ovulatory => "Ovulatory Peak",
            CyclePhase::Luteal => "Luteal Descent",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "Energy is low. Prioritize rest and intuitive movement.",
            CyclePhase::Follicular => "Energy is rising. Great for complex problem solving.",
            CyclePhase::Ovulatory => "Maximum verbal and social energy.",
            CyclePhase::Luteal => "Sensory sensitivity may increase. Focus on grounding.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn anchor_day_is_day_one() {
        let anchor = at(2026, 3, 1);
        assert_eq!(cycle_day(anchor, anchor), 1);
        assert_eq!(cycle_day(anchor, anchor + Duration::hours(23)), 1);
        assert_eq!(cycle_day(anchor, anchor + Duration::hours(24)), 2);
    }

    #[test]
    fn thirty_days_wraps_to_day_three() {
        let now = at(2026, 3, 31);
        assert_eq!(cycle_day(now - Duration::days(30), now), 3);
    }

    #[test]
    fn day_twenty_eight_then_wrap() {
        let anchor = at(2026, 1, 1);
        assert_eq!(cycle_day(anchor, anchor + Duration::days(27)), 28);
        assert_eq!(cycle_day(anchor, anchor + Duration::days(28)), 1);
    }

    #[test]
    fn future_anchor_stays_in_range() {
        let now = at(2026, 1, 10);
        let day = cycle_day(now + Duration::hours(1), now);
        assert_eq!(day, 28);
    }

    #[test]
    fn sub_second_future_anchor_floors_to_previous_day() {
        let now = at(2026, 1, 10);
        assert_eq!(cycle_day(now + Duration::milliseconds(500), now), 28);
        assert_eq!(cycle_day(now - Duration::milliseconds(500), now), 1);
    }

    #[test]
    fn phases_cover_the_cycle() {
        assert_eq!(CyclePhase::for_day(1), CyclePhase::Menstrual);
        assert_eq!(CyclePhase::for_day(5), CyclePhase::Menstrual);
        assert_eq!(CyclePhase::for_day(6), CyclePhase::Follicular);
        assert_eq!(CyclePhase::for_day(13), CyclePhase::Follicular);
        assert_eq!(CyclePhase::for_day(14), CyclePhase::Ovulatory);
        assert_eq!(CyclePhase::for_day(15), CyclePhase::Ovulatory);
        assert_eq!(CyclePhase::for_day(16), CyclePhase::Luteal);
        assert_eq!(CyclePhase::for_day(28), CyclePhase::Luteal);
        assert_eq!(CyclePhase::Ovulatory.name(), "Ovulatory Peak");
    }
}
