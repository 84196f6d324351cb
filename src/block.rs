use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::{
    plan::BlockTimeRecord,
    time_of_day::{MINUTES_PER_DAY, TimeOfDay, TimeParseError},
};

/// An occupied interval on one calendar date. A block without an end is a
/// point reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    start: TimeOfDay,
    end: Option<TimeOfDay>,
}

impl TimeBlock {
    pub fn point(start: TimeOfDay) -> Self {
        Self { start, end: None }
    }

    pub fn ranged(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn new(start: TimeOfDay, end: Option<TimeOfDay>) -> Self {
        Self { start, end }
    }

    /// Reads the block of a persisted plan. `Ok(None)` means the plan has no
    /// block time at all.
    pub fn from_record(record: &BlockTimeRecord) -> Result<Option<Self>, TimeParseError> {
        let start = record.start_time.trim();
        if start.is_empty() {
            return Ok(None);
        }

        let start = TimeOfDay::parse_display(start)?;
        let end = match record.end_time.as_deref().map(str::trim) {
            Some(end) if !end.is_empty() => Some(TimeOfDay::parse_display(end)?),
            _ => None,
        };

        Ok(Some(Self { start, end }))
    }

    pub fn to_record(&self) -> BlockTimeRecord {
        BlockTimeRecord {
            start_time: self.start.format_display(),
            end_time: self.end.map(|end| end.format_display()),
        }
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> Option<TimeOfDay> {
        self.end
    }

    pub fn is_point(&self) -> bool {
        self.end.is_none()
    }

    /// Whether this (proposed) block collides with an already scheduled one.
    ///
    /// The existing block is half-open `[start, end)`; a missing end collapses
    /// it to `start`. Blocks crossing midnight are compared as-is.
    pub fn conflicts_with(&self, existing: &TimeBlock) -> bool {
        let ex_start = existing.start;
        let ex_end = existing.end.unwrap_or(existing.start);
        let new_start = self.start;

        let start_inside = ex_start <= new_start && new_start < ex_end;

        match self.end {
            Some(new_end) => {
                let end_inside = ex_start < new_end && new_end <= ex_end;
                let contains = new_start <= ex_start && new_end >= ex_end;

                start_inside || end_inside || contains
            }
            None => start_inside,
        }
    }

    /// Length of the block for display. An end before the start wraps past
    /// midnight. Not used by `conflicts_with`.
    pub fn display_duration(&self) -> Option<TimeDelta> {
        let end = self.end?;
        let start = i64::from(self.start.minutes_since_midnight());
        let mut end = i64::from(end.minutes_since_midnight());
        if end < start {
            end += i64::from(MINUTES_PER_DAY);
        }

        Some(TimeDelta::minutes(end - start))
    }
}

pub fn format_duration(duration: TimeDelta) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;

    match (hours, minutes) {
        (0, minutes) => format!("{minutes}m"),
        (hours, 0) => format!("{hours}h"),
        (hours, minutes) => format!("{hours}h {minutes}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn t(value: &str) -> TimeOfDay {
        TimeOfDay::parse_24h(value).unwrap()
    }

    fn ranged(start: &str, end: &str) -> TimeBlock {
        TimeBlock::ranged(t(start), t(end))
    }

    #[test]
    pub fn overlapping_blocks_conflict() {
        let existing = ranged("09:00", "10:00");

        assert!(ranged("09:30", "10:30").conflicts_with(&existing));
        assert!(ranged("08:30", "09:30").conflicts_with(&existing));
        assert!(ranged("09:15", "09:45").conflicts_with(&existing));
    }

    #[test]
    pub fn adjacent_blocks_do_not_conflict() {
        let existing = ranged("09:00", "10:00");

        assert!(!ranged("10:00", "11:00").conflicts_with(&existing));
        assert!(!ranged("08:00", "09:00").conflicts_with(&existing));
    }

    #[test]
    pub fn enclosing_block_conflicts() {
        let existing = ranged("09:00", "10:00");

        assert!(ranged("08:00", "11:00").conflicts_with(&existing));
        assert!(ranged("09:00", "10:00").conflicts_with(&existing));
    }

    #[test]
    pub fn existing_point_reminder_conflicts_with_block_starting_at_it() {
        let existing = TimeBlock::point(t("09:00"));

        assert!(ranged("09:00", "10:00").conflicts_with(&existing));
        assert!(ranged("08:00", "09:30").conflicts_with(&existing));
        assert!(!ranged("09:01", "10:00").conflicts_with(&existing));
    }

    #[test]
    pub fn proposed_point_conflicts_only_inside_existing_range() {
        let existing = ranged("09:00", "10:00");

        assert!(TimeBlock::point(t("09:00")).conflicts_with(&existing));
        assert!(TimeBlock::point(t("09:59")).conflicts_with(&existing));
        assert!(!TimeBlock::point(t("10:00")).conflicts_with(&existing));
        assert!(!TimeBlock::point(t("08:59")).conflicts_with(&existing));
    }

    #[test]
    pub fn two_point_reminders_never_conflict() {
        let existing = TimeBlock::point(t("09:00"));

        assert!(!TimeBlock::point(t("09:00")).conflicts_with(&existing));
    }

    #[test]
    pub fn record_with_blank_start_is_not_a_block() {
        let record = BlockTimeRecord {
            start_time: "  ".to_string(),
            end_time: None,
        };

        assert_eq!(TimeBlock::from_record(&record), Ok(None));
    }

    #[test]
    pub fn record_with_blank_end_is_a_point() {
        let record = BlockTimeRecord {
            start_time: "9:00 AM".to_string(),
            end_time: Some(String::new()),
        };

        assert_eq!(
            TimeBlock::from_record(&record),
            Ok(Some(TimeBlock::point(t("09:00"))))
        );
    }

    #[test]
    pub fn record_with_bad_end_fails() {
        let record = BlockTimeRecord {
            start_time: "9:00 AM".to_string(),
            end_time: Some("10".to_string()),
        };

        assert!(TimeBlock::from_record(&record).is_err());
    }

    #[test]
    pub fn display_duration_wraps_past_midnight() {
        assert_eq!(
            ranged("23:00", "01:30").display_duration(),
            Some(TimeDelta::minutes(150))
        );
        assert_eq!(
            ranged("09:00", "10:15").display_duration(),
            Some(TimeDelta::minutes(75))
        );
        assert_eq!(TimeBlock::point(t("09:00")).display_duration(), None);
    }

    #[test]
    pub fn midnight_crossing_block_is_not_normalized_for_conflicts() {
        // 23:00-01:00 compared as-is has end < start, so only the start bound matters.
        let existing = ranged("23:00", "01:00");

        assert!(!ranged("23:30", "23:45").conflicts_with(&existing));
    }

    #[test]
    pub fn duration_formatting() {
        assert_eq!(format_duration(TimeDelta::minutes(45)), "45m");
        assert_eq!(format_duration(TimeDelta::minutes(120)), "2h");
        assert_eq!(format_duration(TimeDelta::minutes(150)), "2h 30m");
    }

    fn time_strategy() -> impl Strategy<Value = TimeOfDay> {
        (0u8..24, 0u8..60).prop_map(|(h, m)| TimeOfDay::from_hm(h, m).unwrap())
    }

    proptest! {
        #[test]
        fn display_duration_is_within_a_day(start in time_strategy(), end in time_strategy()) {
            let duration = TimeBlock::ranged(start, end).display_duration().unwrap();

            prop_assert!(duration >= TimeDelta::zero());
            prop_assert!(duration < TimeDelta::days(1));
        }

        #[test]
        fn ordered_blocks_conflict_symmetrically(
            a in time_strategy(), b in time_strategy(), c in time_strategy(), d in time_strategy()
        ) {
            let (a, b) = if a <= b { (a, b) } else { (b, a) };
            let (c, d) = if c <= d { (c, d) } else { (d, c) };
            prop_assume!(a < b && c < d);

            let first = TimeBlock::ranged(a, b);
            let second = TimeBlock::ranged(c, d);

            prop_assert_eq!(first.conflicts_with(&second), second.conflicts_with(&first));
            prop_assert_eq!(first.conflicts_with(&second), a < d && c < b);
        }
    }
}
