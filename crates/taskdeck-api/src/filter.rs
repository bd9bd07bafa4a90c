//! Filter criteria for the task listing endpoint.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskStatus;

/// Body of `POST /api/task/byfilter`. `status` is omitted from the JSON when
/// unset; the date bounds are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFilterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl TaskFilterRequest {
    /// Build a filter request, filling empty date bounds with the default
    /// one-year window around `today`.
    pub fn new(
        status: Option<TaskStatus>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let (start_date, end_date) = effective_window(start, end, today);
        Self {
            status,
            start_date,
            end_date,
        }
    }
}

/// The effective date window for a listing request.
///
/// An unset start bound becomes one year before `today` at `00:00:00Z`; an
/// unset end bound becomes one year after `today` at `23:59:59Z`. A supplied
/// bound keeps its day and gets the same start-of-day / end-of-day time.
pub fn effective_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_day = start.unwrap_or_else(|| today - Months::new(12));
    let end_day = end.unwrap_or_else(|| today + Months::new(12));

    let start_at = Utc.from_utc_datetime(&start_day.and_time(NaiveTime::MIN));
    let end_at = Utc.from_utc_datetime(&end_day.and_hms_opt(23, 59, 59).unwrap());

    (start_at, end_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_bounds_default_to_one_year_window() {
        let (start, end) = effective_window(None, None, day(2025, 3, 10));

        assert_eq!(start.to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-03-10T23:59:59+00:00");
    }

    #[test]
    fn supplied_bounds_keep_their_day() {
        let (start, end) = effective_window(
            Some(day(2024, 1, 1)),
            Some(day(2024, 12, 31)),
            day(2025, 3, 10),
        );

        assert_eq!(start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-12-31T23:59:59+00:00");
    }

    #[test]
    fn leap_day_clamps_instead_of_overflowing() {
        let (start, end) = effective_window(None, None, day(2024, 2, 29));

        assert_eq!(start.date_naive(), day(2023, 2, 28));
        assert_eq!(end.date_naive(), day(2025, 2, 28));
    }

    #[test]
    fn status_is_omitted_when_unset() {
        let today = day(2025, 3, 10);
        let req = TaskFilterRequest::new(None, None, None, today);
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("status").is_none());
        assert_eq!(value["start_date"], json!("2024-03-10T00:00:00Z"));
        assert_eq!(value["end_date"], json!("2026-03-10T23:59:59Z"));

        let req = TaskFilterRequest::new(Some(TaskStatus::Done), None, None, today);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["status"], json!("done"));
    }
}
