//! Input validation functions
//!
//! Plain validators returning a user-facing message on failure, plus the
//! length limits shared with the `validator` derives in [`crate::types`].

use chrono::NaiveDate;

use crate::calendar::days_between;

/// Longest accepted cycle name
pub const MAX_CYCLE_NAME_LEN: usize = 120;

/// Most days a training log window may span, both ends included
pub const MAX_WINDOW_DAYS: i64 = 3660;

/// Validate a phase duration and return it as an unsigned week count
pub fn validate_phase_duration(duration_weeks: i32) -> Result<u32, String> {
    if duration_weeks <= 0 {
        return Err(format!(
            "Phase duration must be at least 1 week, got {}",
            duration_weeks
        ));
    }
    Ok(duration_weeks.unsigned_abs())
}

/// Validate a cycle name
pub fn validate_cycle_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Cycle name cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_CYCLE_NAME_LEN {
        return Err(format!(
            "Cycle name cannot exceed {} characters",
            MAX_CYCLE_NAME_LEN
        ));
    }
    Ok(())
}

/// Validate an inclusive date window: ordered bounds, at most
/// [`MAX_WINDOW_DAYS`] long
pub fn validate_date_window(min_date: NaiveDate, max_date: NaiveDate) -> Result<(), String> {
    if min_date > max_date {
        return Err(format!(
            "min_date {} must not be after max_date {}",
            min_date, max_date
        ));
    }
    validate_window_span(min_date, max_date)
}

/// Validate only the length of a date window (inverted windows pass)
pub fn validate_window_span(min_date: NaiveDate, max_date: NaiveDate) -> Result<(), String> {
    let days = days_between(max_date, min_date).saturating_add(1);
    if days > MAX_WINDOW_DAYS {
        return Err(format!(
            "Date window cannot exceed {} days, got {}",
            MAX_WINDOW_DAYS, days
        ));
    }
    Ok(())
}

/// Map field names to display labels for error messages
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Cycle Name",
        "start_date" => "Start Date",
        "phases" => "Phases",
        "duration_weeks" => "Phase Duration",
        "activities" => "Activities",
        "cycles" => "Training Cycles",
        "min_date" => "First Day",
        "max_date" => "Last Day",
        "utc_offset_minutes" => "UTC Offset",
        _ => field_name,
    }
}
