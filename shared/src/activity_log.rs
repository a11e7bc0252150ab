//! Structured training log
//!
//! Turns a flat, unordered list of activities into a calendar report:
//! year → month → ISO week → day, with totals rolled up at every level and
//! rest days marked.
//!
//! Rules worth knowing before reading the code:
//! - The report window `[min_date, max_date]` comes from the caller, not from
//!   the activities, so a week without any activity still shows up.
//! - Weeks always have seven days, Monday first. Days of a boundary week that
//!   fall outside the window are placeholders flagged `is_out_of_range`; they
//!   are never rest days.
//! - A week is filed under the month (and year) of its Monday, even when most
//!   of its days belong to the next month.
//! - [`ActivityLogAggregator::aggregate`] always returns every level fully
//!   populated. [`StructuredLog::compact`] is the separate rendering step that
//!   drops child lists of buckets without activities.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::AddAssign;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calendar::{add_weeks, iso_week, iso_week_year, week_days, week_start, TimezonePolicy};
use crate::errors::{CoreError, CoreResult, SoftDataError};
use crate::models::ActivityRecord;
use crate::validation::validate_date_window;

/// Rolled-up activity metrics for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub elevation_gain_meters: f64,
    pub activity_count: u32,
}

impl Totals {
    /// Metrics of a single activity; missing values count as zero.
    pub fn from_activity(activity: &ActivityRecord) -> Self {
        Self {
            distance_meters: activity.distance_meters.unwrap_or(0.0),
            duration_seconds: activity.duration_seconds.unwrap_or(0.0),
            elevation_gain_meters: activity.elevation_gain_meters.unwrap_or(0.0),
            activity_count: 1,
        }
    }

    /// True when no activity contributed to this bucket
    pub fn is_empty(&self) -> bool {
        self.activity_count == 0
    }
}

impl AddAssign<&Totals> for Totals {
    fn add_assign(&mut self, other: &Totals) {
        self.distance_meters += other.distance_meters;
        self.duration_seconds += other.duration_seconds;
        self.elevation_gain_meters += other.elevation_gain_meters;
        self.activity_count += other.activity_count;
    }
}

impl<'a> Sum<&'a Totals> for Totals {
    fn sum<I: Iterator<Item = &'a Totals>>(iter: I) -> Self {
        iter.fold(Totals::default(), |mut acc, t| {
            acc += t;
            acc
        })
    }
}

impl Sum<Totals> for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        iter.fold(Totals::default(), |mut acc, t| {
            acc += &t;
            acc
        })
    }
}

/// One calendar day of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    /// 0 = Monday … 6 = Sunday
    pub weekday: u32,
    /// Inside the window and nothing recorded
    pub is_rest_day: bool,
    /// Placeholder completing a boundary week; carries no data
    pub is_out_of_range: bool,
    /// Activities in chronological order, or `None` when there are none
    pub activities: Option<Vec<ActivityRecord>>,
    pub totals: Totals,
}

impl DayEntry {
    fn rest(date: NaiveDate) -> Self {
        Self {
            date,
            weekday: date.weekday().num_days_from_monday(),
            is_rest_day: true,
            is_out_of_range: false,
            activities: None,
            totals: Totals::default(),
        }
    }

    fn active(date: NaiveDate, activities: Vec<ActivityRecord>) -> Self {
        let totals = activities.iter().map(Totals::from_activity).sum();
        Self {
            date,
            weekday: date.weekday().num_days_from_monday(),
            is_rest_day: false,
            is_out_of_range: false,
            activities: Some(activities),
            totals,
        }
    }

    fn out_of_range(date: NaiveDate) -> Self {
        Self {
            date,
            weekday: date.weekday().num_days_from_monday(),
            is_rest_day: false,
            is_out_of_range: true,
            activities: None,
            totals: Totals::default(),
        }
    }
}

/// An ISO week, Monday to Sunday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekEntry {
    pub week_number: u32,
    pub iso_year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Exactly seven days when present
    pub days: Option<Vec<DayEntry>>,
    pub totals: Totals,
}

impl WeekEntry {
    fn collapse_empty(&mut self) {
        if self.totals.is_empty() {
            self.days = None;
        }
    }
}

/// Weeks whose Monday falls in `month` of `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthEntry {
    pub year: i32,
    /// 1 = January … 12 = December
    pub month: u32,
    pub weeks: Option<Vec<WeekEntry>>,
    pub totals: Totals,
}

impl MonthEntry {
    fn collapse_empty(&mut self) {
        if self.totals.is_empty() {
            self.weeks = None;
        } else if let Some(weeks) = self.weeks.as_mut() {
            weeks.iter_mut().for_each(WeekEntry::collapse_empty);
        }
    }
}

/// Months of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearEntry {
    pub year: i32,
    pub months: Option<Vec<MonthEntry>>,
    pub totals: Totals,
}

impl YearEntry {
    fn collapse_empty(&mut self) {
        if self.totals.is_empty() {
            self.months = None;
        } else if let Some(months) = self.months.as_mut() {
            months.iter_mut().for_each(MonthEntry::collapse_empty);
        }
    }
}

/// Root of the calendar report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredLog {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// Ascending by year
    pub years: Vec<YearEntry>,
    pub totals: Totals,
    /// Activities dropped because their start time could not be read
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_activity_ids: Vec<Uuid>,
}

impl StructuredLog {
    /// Drop the child list of every bucket that has no activities.
    ///
    /// Totals are untouched; only `months`, `weeks` and `days` become `None`.
    pub fn compact(mut self) -> Self {
        self.years.iter_mut().for_each(YearEntry::collapse_empty);
        self
    }

    /// Every week still present in the report, in calendar order.
    pub fn weeks(&self) -> impl Iterator<Item = &WeekEntry> {
        self.years
            .iter()
            .filter_map(|y| y.months.as_deref())
            .flatten()
            .filter_map(|m| m.weeks.as_deref())
            .flatten()
    }

    /// Every day still present in the report, placeholders included.
    pub fn days(&self) -> impl Iterator<Item = &DayEntry> {
        self.weeks().filter_map(|w| w.days.as_deref()).flatten()
    }

    /// The in-window entry for `date`, if the report still holds it.
    pub fn find_day(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.days().find(|d| d.date == date && !d.is_out_of_range)
    }
}

/// Builds [`StructuredLog`]s under a fixed timezone policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityLogAggregator {
    policy: TimezonePolicy,
}

impl ActivityLogAggregator {
    pub fn new(policy: TimezonePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TimezonePolicy {
        self.policy
    }

    /// Aggregate `records` over the inclusive window `[min_date, max_date]`.
    ///
    /// Fails only when the window itself is invalid: inverted, or longer than
    /// [`MAX_WINDOW_DAYS`](crate::validation::MAX_WINDOW_DAYS). Records with unreadable
    /// start times are logged, listed in `skipped_activity_ids` and left out;
    /// records dated outside the window are ignored.
    pub fn aggregate(
        &self,
        records: &[ActivityRecord],
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> CoreResult<StructuredLog> {
        validate_date_window(min_date, max_date).map_err(CoreError::Configuration)?;

        let (by_date, skipped_activity_ids) = self.group_by_date(records, min_date, max_date);

        let mut weeks = Vec::new();
        let last_monday = week_start(max_date);
        let mut monday = week_start(min_date);
        loop {
            weeks.push(build_week(monday, &by_date, min_date, max_date));

            let next = add_weeks(monday, 1);
            if monday >= last_monday || next <= monday {
                break;
            }
            monday = next;
        }

        let years = group_into_years(weeks);
        let totals = years.iter().map(|y| &y.totals).sum();

        debug!(
            %min_date,
            %max_date,
            activities = records.len(),
            skipped = skipped_activity_ids.len(),
            "Built structured training log"
        );

        Ok(StructuredLog {
            min_date,
            max_date,
            years,
            totals,
            skipped_activity_ids,
        })
    }

    /// [`aggregate`](Self::aggregate) followed by [`StructuredLog::compact`].
    pub fn aggregate_compact(
        &self,
        records: &[ActivityRecord],
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> CoreResult<StructuredLog> {
        self.aggregate(records, min_date, max_date)
            .map(StructuredLog::compact)
    }

    /// Bucket records by calendar day, each day in chronological order.
    fn group_by_date(
        &self,
        records: &[ActivityRecord],
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> (BTreeMap<NaiveDate, Vec<ActivityRecord>>, Vec<Uuid>) {
        let mut dated: Vec<(DateTime<FixedOffset>, &ActivityRecord)> =
            Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for record in records {
            match self.policy.parse_start_time(&record.start_time) {
                Ok(instant) => dated.push((instant, record)),
                Err(reason) => {
                    let err = SoftDataError {
                        activity_id: record.id,
                        start_time: record.start_time.clone(),
                        reason,
                    };
                    warn!(activity_id = %record.id, error = %err, "Dropping activity from training log");
                    skipped.push(record.id);
                }
            }
        }

        // Stable: records with identical instants keep their input order
        dated.sort_by_key(|(instant, _)| *instant);

        let mut by_date: BTreeMap<NaiveDate, Vec<ActivityRecord>> = BTreeMap::new();
        let mut outside_window = 0usize;
        for (instant, record) in dated {
            let day = instant.date_naive();
            if day < min_date || day > max_date {
                outside_window += 1;
                continue;
            }
            by_date.entry(day).or_default().push(record.clone());
        }

        if outside_window > 0 {
            debug!(
                count = outside_window,
                %min_date,
                %max_date,
                "Ignoring activities outside the log window"
            );
        }

        (by_date, skipped)
    }
}

/// Aggregate with an explicit timezone policy.
pub fn aggregate(
    records: &[ActivityRecord],
    min_date: NaiveDate,
    max_date: NaiveDate,
    policy: TimezonePolicy,
) -> CoreResult<StructuredLog> {
    ActivityLogAggregator::new(policy).aggregate(records, min_date, max_date)
}

/// Aggregate and compact for rendering.
pub fn aggregate_compact(
    records: &[ActivityRecord],
    min_date: NaiveDate,
    max_date: NaiveDate,
    policy: TimezonePolicy,
) -> CoreResult<StructuredLog> {
    ActivityLogAggregator::new(policy).aggregate_compact(records, min_date, max_date)
}

fn build_week(
    monday: NaiveDate,
    by_date: &BTreeMap<NaiveDate, Vec<ActivityRecord>>,
    min_date: NaiveDate,
    max_date: NaiveDate,
) -> WeekEntry {
    let dates = week_days(monday);
    let days: Vec<DayEntry> = dates
        .iter()
        .map(|&date| {
            if date < min_date || date > max_date {
                DayEntry::out_of_range(date)
            } else {
                match by_date.get(&date) {
                    Some(activities) => DayEntry::active(date, activities.clone()),
                    None => DayEntry::rest(date),
                }
            }
        })
        .collect();
    let totals = days.iter().map(|d| &d.totals).sum();

    WeekEntry {
        week_number: iso_week(monday),
        iso_year: iso_week_year(monday),
        start_date: monday,
        end_date: dates[6],
        days: Some(days),
        totals,
    }
}

/// File weeks under the month and year of their Monday.
fn group_into_years(weeks: Vec<WeekEntry>) -> Vec<YearEntry> {
    let mut by_month: BTreeMap<(i32, u32), Vec<WeekEntry>> = BTreeMap::new();
    for week in weeks {
        let key = (week.start_date.year(), week.start_date.month());
        by_month.entry(key).or_default().push(week);
    }

    let mut by_year: BTreeMap<i32, Vec<MonthEntry>> = BTreeMap::new();
    for ((year, month), weeks) in by_month {
        let totals = weeks.iter().map(|w| &w.totals).sum();
        by_year.entry(year).or_default().push(MonthEntry {
            year,
            month,
            weeks: Some(weeks),
            totals,
        });
    }

    by_year
        .into_iter()
        .map(|(year, months)| {
            let totals = months.iter().map(|m| &m.totals).sum();
            YearEntry {
                year,
                months: Some(months),
                totals,
            }
        })
        .collect()
}
