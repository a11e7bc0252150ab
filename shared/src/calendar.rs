//! Calendar arithmetic for the training log
//!
//! ISO-8601 week numbering, Monday-aligned week boundaries and week offsets,
//! plus the timezone policy used to turn activity instants into calendar days.
//!
//! Every function here is total over the dates `chrono` can represent:
//! arithmetic that would leave the representable range saturates instead of
//! panicking.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

/// Largest accepted offset magnitude (exclusive), matching `FixedOffset`
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Naive (offset-less) timestamp layouts accepted for activity start times
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// ISO-8601 week number (1..=53) of `date`.
///
/// Weeks start on Monday and week 1 is the week holding the year's first
/// Thursday, so the first days of January can belong to week 52/53 of the
/// previous year and the last days of December to week 1 of the next.
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// ISO week-numbering year of `date` (may differ from the calendar year
/// around New Year).
pub fn iso_week_year(date: NaiveDate) -> i32 {
    date.iso_week().year()
}

/// The Monday on or before `date`.
///
/// Dates in the partial week at the bottom of the representable range clamp
/// to [`first_monday`].
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back))
        .unwrap_or_else(first_monday)
}

/// Earliest representable Monday.
pub fn first_monday() -> NaiveDate {
    let skip = (7 - NaiveDate::MIN.weekday().num_days_from_monday()) % 7;
    NaiveDate::MIN
        .checked_add_days(Days::new(u64::from(skip)))
        .unwrap_or(NaiveDate::MIN)
}

/// Midnight of the Monday on or before `instant`.
pub fn week_start_of_instant(instant: NaiveDateTime) -> NaiveDateTime {
    week_start(instant.date()).and_time(NaiveTime::MIN)
}

/// Add `weeks × 7` calendar days to `date` (negative values go backwards).
pub fn add_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    let days = weeks.saturating_mul(7);
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };

    shifted.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Add `weeks × 7` days, or `None` past the last representable date.
pub fn checked_add_weeks(date: NaiveDate, weeks: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(weeks) * 7))
}

/// The seven dates of the week starting at `monday`, in ascending order.
pub fn week_days(monday: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| {
        monday
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(NaiveDate::MAX)
    })
}

/// Whole days from `earlier` to `later` (negative if `later` comes first).
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

/// How instants are mapped to calendar days.
///
/// The policy is a fixed offset from UTC so that the same activity always
/// lands on the same day regardless of where the code runs. The default is
/// UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimezonePolicy {
    /// Offset east of UTC, in minutes (e.g. `-300` for UTC-05:00)
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl TimezonePolicy {
    /// Calendar days are UTC days.
    pub const UTC: Self = Self {
        utc_offset_minutes: 0,
    };

    /// Build a policy for a fixed offset, rejecting offsets of a day or more.
    pub fn fixed(utc_offset_minutes: i32) -> CoreResult<Self> {
        if utc_offset_minutes.unsigned_abs() >= MAX_OFFSET_MINUTES.unsigned_abs() {
            return Err(CoreError::Configuration(format!(
                "UTC offset must be within ±{} minutes, got {}",
                MAX_OFFSET_MINUTES - 1,
                utc_offset_minutes
            )));
        }
        Ok(Self { utc_offset_minutes })
    }

    /// The policy as a `chrono` offset.
    ///
    /// Out-of-range offsets (only reachable by constructing the struct
    /// literally) fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
    }

    /// Calendar date of `instant` under this policy.
    pub fn calendar_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset()).date_naive()
    }

    /// Parse an activity start time.
    ///
    /// RFC 3339 timestamps are converted into the policy's offset; naive
    /// wall-clock timestamps (and bare dates, read as midnight) are taken to
    /// already be in the policy's zone.
    pub fn parse_start_time(&self, raw: &str) -> Result<DateTime<FixedOffset>, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("start time is empty".to_string());
        }

        let offset = self.offset();

        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(instant.with_timezone(&offset));
        }

        let naive = NAIVE_LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .ok_or_else(|| "not an ISO-8601 date-time".to_string())?;

        offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| "ambiguous local time".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Weekday};
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Reference rule: shift to the Thursday of the same week, then count
    /// whole weeks since the start of that Thursday's year.
    fn thursday_rule(date: NaiveDate) -> u32 {
        let offset = 3 - i64::from(date.weekday().num_days_from_monday());
        let thursday = date + Duration::days(offset);
        thursday.ordinal0() / 7 + 1
    }

    #[rstest]
    #[case(date(2024, 6, 10), 24, 2024)]
    #[case(date(2024, 6, 16), 24, 2024)]
    #[case(date(2024, 1, 1), 1, 2024)]
    #[case(date(2021, 1, 1), 53, 2020)]
    #[case(date(2020, 12, 31), 53, 2020)]
    #[case(date(2024, 12, 30), 1, 2025)]
    #[case(date(2026, 1, 1), 1, 2026)]
    #[case(date(2027, 1, 1), 53, 2026)]
    #[case(date(2016, 1, 3), 53, 2015)]
    fn test_iso_week_boundaries(#[case] day: NaiveDate, #[case] week: u32, #[case] year: i32) {
        assert_eq!(iso_week(day), week);
        assert_eq!(iso_week_year(day), year);
    }

    #[test]
    fn test_week_start_calculation() {
        let monday = date(2024, 12, 30);
        assert_eq!(week_start(monday), monday);

        let sunday = date(2025, 1, 5);
        assert_eq!(week_start(sunday), monday);

        let wednesday = date(2025, 1, 1);
        assert_eq!(week_start(wednesday), monday);
    }

    #[test]
    fn test_week_start_of_instant_zeroes_time() {
        let instant = date(2024, 6, 13).and_hms_opt(18, 45, 12).unwrap();
        let start = week_start_of_instant(instant);
        assert_eq!(start, date(2024, 6, 10).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_add_weeks() {
        assert_eq!(add_weeks(date(2024, 1, 1), 4), date(2024, 1, 29));
        assert_eq!(add_weeks(date(2024, 1, 29), 3), date(2024, 2, 19));
        assert_eq!(add_weeks(date(2024, 1, 29), -4), date(2024, 1, 1));
        assert_eq!(add_weeks(date(2024, 1, 1), 0), date(2024, 1, 1));
    }

    #[test]
    fn test_add_weeks_saturates() {
        assert_eq!(add_weeks(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_weeks(NaiveDate::MIN, -1), NaiveDate::MIN);
        assert_eq!(add_weeks(date(2024, 1, 1), i64::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_checked_add_weeks() {
        assert_eq!(checked_add_weeks(date(2024, 1, 1), 4), Some(date(2024, 1, 29)));
        assert_eq!(checked_add_weeks(date(2024, 1, 1), u32::MAX), None);
        assert_eq!(checked_add_weeks(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn test_week_start_clamps_at_range_floor() {
        let floor = first_monday();
        assert_eq!(floor.weekday(), Weekday::Mon);
        assert!(days_between(floor, NaiveDate::MIN) < 7);

        let start = week_start(NaiveDate::MIN);
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(start, week_start(floor));
    }

    #[test]
    fn test_week_days_are_monday_to_sunday() {
        let days = week_days(date(2024, 5, 27));
        assert_eq!(days[0], date(2024, 5, 27));
        assert_eq!(days[6], date(2024, 6, 2));
        assert_eq!(days[0].weekday(), Weekday::Mon);
        assert_eq!(days[6].weekday(), Weekday::Sun);
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2024, 1, 15), date(2024, 1, 1)), 14);
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 15)), -14);
    }

    #[test]
    fn test_timezone_policy_bounds() {
        assert!(TimezonePolicy::fixed(-720).is_ok());
        assert!(TimezonePolicy::fixed(1439).is_ok());
        assert!(matches!(
            TimezonePolicy::fixed(1440),
            Err(CoreError::Configuration(_))
        ));
    }

    #[test]
    fn test_parse_rfc3339_converts_to_policy_zone() {
        let utc = TimezonePolicy::UTC;
        let plus_two = TimezonePolicy::fixed(120).unwrap();

        let late = "2024-06-09T23:30:00Z";
        assert_eq!(utc.parse_start_time(late).unwrap().date_naive(), date(2024, 6, 9));
        assert_eq!(
            plus_two.parse_start_time(late).unwrap().date_naive(),
            date(2024, 6, 10)
        );

        let early_local = "2024-06-10T01:00:00+02:00";
        assert_eq!(
            utc.parse_start_time(early_local).unwrap().date_naive(),
            date(2024, 6, 9)
        );
    }

    #[test]
    fn test_parse_naive_is_wall_clock() {
        let minus_five = TimezonePolicy::fixed(-300).unwrap();
        for raw in [
            "2024-06-10T07:15:00",
            "2024-06-10 07:15:00",
            "2024-06-10T07:15:00.250",
            "2024-06-10T07:15",
        ] {
            let parsed = minus_five.parse_start_time(raw).unwrap();
            assert_eq!(parsed.date_naive(), date(2024, 6, 10), "{raw}");
        }
        let midnight = minus_five.parse_start_time("2024-06-10").unwrap();
        assert_eq!(midnight.date_naive(), date(2024, 6, 10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let policy = TimezonePolicy::UTC;
        assert!(policy.parse_start_time("").is_err());
        assert!(policy.parse_start_time("last tuesday").is_err());
        assert!(policy.parse_start_time("2024-13-40T00:00:00Z").is_err());
    }

    #[test]
    fn test_calendar_date_uses_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 31, 22, 0, 0).unwrap();
        assert_eq!(TimezonePolicy::UTC.calendar_date(instant), date(2024, 3, 31));
        assert_eq!(
            TimezonePolicy::fixed(180).unwrap().calendar_date(instant),
            date(2024, 4, 1)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_iso_week_matches_thursday_rule(year in 1970i32..2100, day_of_year in 1u32..367) {
            let day = NaiveDate::from_yo_opt(year, day_of_year);
            prop_assume!(day.is_some());
            let day = day.unwrap();
            prop_assert_eq!(iso_week(day), thursday_rule(day));
        }

        #[test]
        fn test_week_start_always_monday(year in 1970i32..2100, day_of_year in 1u32..367) {
            let day = NaiveDate::from_yo_opt(year, day_of_year);
            prop_assume!(day.is_some());
            let day = day.unwrap();

            let start = week_start(day);
            prop_assert_eq!(start.weekday(), Weekday::Mon);
            prop_assert!(start <= day);
            prop_assert!(days_between(day, start) <= 6);
            prop_assert_eq!(iso_week(start), iso_week(day));
        }

        #[test]
        fn test_add_weeks_preserves_weekday(
            year in 1970i32..2100,
            day_of_year in 1u32..366,
            weeks in -520i64..520
        ) {
            let day = NaiveDate::from_yo_opt(year, day_of_year).unwrap();
            let shifted = add_weeks(day, weeks);
            prop_assert_eq!(shifted.weekday(), day.weekday());
            prop_assert_eq!(days_between(shifted, day), weeks * 7);
        }
    }
}
