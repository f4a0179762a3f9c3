//! Streak, consistency and calendar arithmetic over a set of completion dates.
//!
//! Everything here is pure: callers pass the record and a "today" date and get
//! fresh values back. Persistence lives in `db`.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};

use crate::catalog::weekday_index;
use crate::error::{Error, Result};
use crate::models::{CalendarCell, CompletionRecord, DayPoint, Level, WeekdayPattern};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the progress chart window, in days.
pub const SERIES_DAYS: i64 = 30;

/// Parses a canonical `YYYY-MM-DD` date. Unpadded or otherwise sloppy input is
/// rejected rather than guessed at.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(Error::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Records `date` as completed.
///
/// Completing an already-completed date is a no-op. Otherwise the stored
/// streak is extended when the previous calendar day is present and reset to 1
/// when it is not. The streak is never recounted from the full set, so a
/// backfilled date can leave it disagreeing with [`run_ending_at`].
pub fn mark_date_complete(mut record: CompletionRecord, date: NaiveDate) -> CompletionRecord {
    if record.is_completed(date) {
        debug!(date = %date, "day already completed, nothing to do");
        return record;
    }

    if let Some(latest) = record.latest() {
        if date < latest {
            warn!(
                date = %date,
                latest = %latest,
                "backfilling a day before the latest completion, streak stays incremental"
            );
        }
    }

    let yesterday = date - Duration::days(1);
    record.streak = if record.is_completed(yesterday) {
        record.streak + 1
    } else {
        1
    };
    record.total_completed += 1;
    record.completed_dates.insert(date);

    debug!(
        date = %date,
        streak = record.streak,
        total = record.total_completed,
        "day completed"
    );
    record
}

/// One point per day for the `days` days ending at `today`, oldest first.
pub fn series_ending(dates: &BTreeSet<NaiveDate>, today: NaiveDate, days: i64) -> Vec<DayPoint> {
    (0..days)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DayPoint {
                date,
                completed: u8::from(dates.contains(&date)),
            }
        })
        .collect()
}

pub fn last_30_days_series(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Vec<DayPoint> {
    series_ending(dates, today, SERIES_DAYS)
}

fn first_of_month(year: i32, month0: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or(Error::InvalidMonth {
        year,
        month: month0,
    })
}

pub fn days_in_month(year: i32, month0: u32) -> Result<u32> {
    let first = first_of_month(year, month0)?;
    let next = if month0 == 11 {
        first_of_month(year + 1, 0)?
    } else {
        first_of_month(year, month0 + 1)?
    };
    Ok((next - first).num_days() as u32)
}

/// Month grid for a Sunday-first calendar. `month0` is zero-based, so
/// February is 1.
pub fn calendar_month(
    dates: &BTreeSet<NaiveDate>,
    year: i32,
    month0: u32,
) -> Result<Vec<CalendarCell>> {
    let first = first_of_month(year, month0)?;
    let padding = weekday_index(first);
    let days = days_in_month(year, month0)?;

    let mut cells = Vec::with_capacity(padding + days as usize);
    cells.extend(std::iter::repeat(CalendarCell::padding()).take(padding));
    for day in 1..=days {
        let date = first + Duration::days(i64::from(day - 1));
        cells.push(CalendarCell {
            day: Some(day),
            date: Some(date),
            completed: dates.contains(&date),
        });
    }
    Ok(cells)
}

/// Percentage of completed days in the series, rounded half up.
///
/// An empty series has no meaningful ratio and yields `None`; callers decide
/// how to present that.
pub fn consistency(series: &[DayPoint]) -> Option<u32> {
    if series.is_empty() {
        return None;
    }
    let completed = series.iter().filter(|p| p.completed == 1).count();
    let pct = 100.0 * completed as f64 / series.len() as f64;
    Some(pct.round() as u32)
}

pub fn weekday_intensity(dates: &BTreeSet<NaiveDate>) -> WeekdayPattern {
    let mut pattern = WeekdayPattern::default();
    for date in dates {
        pattern.counts[weekday_index(*date)] += 1;
    }
    pattern
}

pub fn completed_in_month(dates: &BTreeSet<NaiveDate>, year: i32, month0: u32) -> usize {
    dates
        .iter()
        .filter(|d| d.year() == year && d.month0() == month0)
        .count()
}

/// Length of the run of consecutive completed days ending at `date`.
pub fn run_ending_at(dates: &BTreeSet<NaiveDate>, date: NaiveDate) -> u32 {
    let mut run = 0;
    let mut cursor = date;
    while dates.contains(&cursor) {
        run += 1;
        cursor -= Duration::days(1);
    }
    run
}

/// Longest run of consecutive completed days anywhere in the history.
pub fn best_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut current = 0;
    let mut prev: Option<NaiveDate> = None;
    for &date in dates {
        current = match prev {
            Some(p) if date - p == Duration::days(1) => current + 1,
            _ => 1,
        };
        best = best.max(current);
        prev = Some(date);
    }
    best
}

/// Progress toward the level goal as a percentage, capped at 100.
pub fn level_progress(total_completed: u32, level: Level) -> u32 {
    (total_completed.saturating_mul(100) / level.goal()).min(100)
}

/// `(year, month0)` pairs for the `count` months ending with the month of
/// `today`, newest first.
pub fn month_options(today: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let mut year = today.year();
    let mut month0 = today.month0();
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push((year, month0));
        if month0 == 0 {
            month0 = 11;
            year -= 1;
        } else {
            month0 -= 1;
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Summary {
    pub streak: u32,
    pub best_streak: u32,
    pub total_completed: u32,
    pub level: Level,
    pub goal: u32,
    pub goal_progress: u32,
    pub this_month: usize,
    pub consistency: Option<u32>,
}

pub fn summarize(record: &CompletionRecord, today: NaiveDate) -> Summary {
    let series = last_30_days_series(&record.completed_dates, today);
    Summary {
        streak: record.streak,
        best_streak: best_streak(&record.completed_dates),
        total_completed: record.total_completed,
        level: record.level,
        goal: record.level.goal(),
        goal_progress: level_progress(record.total_completed, record.level),
        this_month: completed_in_month(&record.completed_dates, today.year(), today.month0()),
        consistency: consistency(&series),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn record_with(dates: &[&str], streak: u32) -> CompletionRecord {
        let completed_dates: BTreeSet<NaiveDate> = dates.iter().map(|s| d(s)).collect();
        CompletionRecord {
            total_completed: completed_dates.len() as u32,
            completed_dates,
            streak,
            level: Level::Beginner,
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn parse_valid_date() {
            assert_eq!(
                parse_date("2024-02-29").unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
            );
        }

        #[test]
        fn parse_rejects_malformed() {
            for bad in [
                "2024-2-29",
                "2023-02-29",
                "not-a-date",
                "",
                "2024/02/01",
                "2024-02-01T00",
                "-001-01-01",
                "+202-01-01",
                " 2024-01-01",
                "2024-01-01 ",
            ] {
                assert!(
                    matches!(parse_date(bad), Err(Error::InvalidDate(_))),
                    "expected rejection for '{}'",
                    bad
                );
            }
        }

        #[test]
        fn accepted_dates_format_back_unchanged() {
            for good in ["2024-02-29", "0001-01-01", "9999-12-31"] {
                assert_eq!(format_date(parse_date(good).unwrap()), good);
            }
        }

        #[test]
        fn format_is_canonical() {
            assert_eq!(format_date(d("2024-01-05")), "2024-01-05");
        }
    }

    mod mark_complete_tests {
        use super::*;

        #[test]
        fn first_completion_starts_streak() {
            let r = mark_date_complete(CompletionRecord::default(), d("2024-03-10"));
            assert_eq!(r.streak, 1);
            assert_eq!(r.total_completed, 1);
            assert!(r.is_completed(d("2024-03-10")));
        }

        #[test]
        fn consecutive_day_extends_streak() {
            let r = record_with(&["2024-01-01", "2024-01-02"], 2);
            let r = mark_date_complete(r, d("2024-01-03"));
            assert_eq!(r.streak, 3);
            assert_eq!(r.total_completed, 3);
        }

        #[test]
        fn gap_resets_streak() {
            let r = record_with(&["2024-01-01", "2024-01-02"], 2);
            let r = mark_date_complete(r, d("2024-01-10"));
            assert_eq!(r.streak, 1);
            assert_eq!(r.total_completed, 3);
        }

        #[test]
        fn is_idempotent() {
            let base = record_with(&["2024-01-01", "2024-01-02"], 2);
            for date in ["2024-01-02", "2024-01-03", "2024-01-20"] {
                let once = mark_date_complete(base.clone(), d(date));
                let twice = mark_date_complete(once.clone(), d(date));
                assert_eq!(once, twice);
            }
        }

        #[test]
        fn total_tracks_distinct_dates() {
            let mut r = CompletionRecord::default();
            for date in ["2024-05-01", "2024-05-02", "2024-05-02", "2024-05-04", "2024-05-01"] {
                r = mark_date_complete(r, d(date));
                assert_eq!(r.total_completed as usize, r.completed_dates.len());
            }
            assert_eq!(r.total_completed, 3);
        }

        #[test]
        fn yesterday_is_calendar_not_list_order() {
            // Month boundary: Feb 29 -> Mar 1 in a leap year
            let r = record_with(&["2024-02-29"], 1);
            let r = mark_date_complete(r, d("2024-03-01"));
            assert_eq!(r.streak, 2);
        }

        #[test]
        fn backfill_keeps_incremental_streak_and_diverges_from_recount() {
            // Current run: Jan 5-6 (streak 2). Jan 3 is missing.
            let r = record_with(&["2024-01-02", "2024-01-05", "2024-01-06"], 2);
            let r = mark_date_complete(r, d("2024-01-03"));

            // Jan 2 is present, so the stored streak is incremented...
            assert_eq!(r.streak, 3);
            // ...although the run ending at the latest completion is still 2.
            let latest = r.latest().unwrap();
            assert_eq!(run_ending_at(&r.completed_dates, latest), 2);
            assert_ne!(r.streak, run_ending_at(&r.completed_dates, latest));
        }

        #[test]
        fn backfill_without_neighbour_resets_streak() {
            let r = record_with(&["2024-01-05", "2024-01-06", "2024-01-07"], 3);
            let r = mark_date_complete(r, d("2023-12-01"));
            assert_eq!(r.streak, 1);
            assert_eq!(run_ending_at(&r.completed_dates, d("2024-01-07")), 3);
        }
    }

    mod series_tests {
        use super::*;

        #[test]
        fn series_has_thirty_ascending_days_ending_today() {
            let today = d("2024-03-05");
            let series = last_30_days_series(&BTreeSet::new(), today);
            assert_eq!(series.len(), 30);
            assert_eq!(series.first().unwrap().date, d("2024-02-05"));
            assert_eq!(series.last().unwrap().date, today);
            assert!(series.windows(2).all(|w| w[1].date - w[0].date == Duration::days(1)));
        }

        #[test]
        fn series_marks_completed_days() {
            let r = record_with(&["2024-03-05", "2024-03-01", "2023-01-01"], 1);
            let series = last_30_days_series(&r.completed_dates, d("2024-03-05"));
            let done: Vec<NaiveDate> = series
                .iter()
                .filter(|p| p.completed == 1)
                .map(|p| p.date)
                .collect();
            assert_eq!(done, vec![d("2024-03-01"), d("2024-03-05")]);
        }

        #[test]
        fn series_is_recomputed_fresh() {
            let r = record_with(&["2024-03-05"], 1);
            let a = last_30_days_series(&r.completed_dates, d("2024-03-05"));
            let b = last_30_days_series(&r.completed_dates, d("2024-03-05"));
            assert_eq!(a, b);
        }
    }

    mod calendar_tests {
        use super::*;

        #[test]
        fn february_2024_has_four_padding_cells() {
            let cells = calendar_month(&BTreeSet::new(), 2024, 1).unwrap();
            let padding = cells.iter().take_while(|c| c.day.is_none()).count();
            assert_eq!(padding, 4);
            assert_eq!(cells.len(), 4 + 29);
            let days: Vec<u32> = cells.iter().filter_map(|c| c.day).collect();
            assert_eq!(days, (1..=29).collect::<Vec<_>>());
        }

        #[test]
        fn month_starting_sunday_has_no_padding() {
            // September 2024 starts on a Sunday
            let cells = calendar_month(&BTreeSet::new(), 2024, 8).unwrap();
            assert_eq!(cells[0].day, Some(1));
            assert_eq!(cells.len(), 30);
        }

        #[test]
        fn completed_flags_follow_set() {
            let r = record_with(&["2024-02-01", "2024-02-29", "2024-03-01"], 1);
            let cells = calendar_month(&r.completed_dates, 2024, 1).unwrap();
            let done: Vec<u32> = cells
                .iter()
                .filter(|c| c.completed)
                .filter_map(|c| c.day)
                .collect();
            assert_eq!(done, vec![1, 29]);
            assert_eq!(cells[4].date, Some(d("2024-02-01")));
        }

        #[test]
        fn december_wraps_year() {
            assert_eq!(days_in_month(2024, 11).unwrap(), 31);
            assert_eq!(days_in_month(2023, 1).unwrap(), 28);
        }

        #[test]
        fn invalid_month_is_error() {
            assert!(matches!(
                calendar_month(&BTreeSet::new(), 2024, 12),
                Err(Error::InvalidMonth { year: 2024, month: 12 })
            ));
        }
    }

    mod consistency_tests {
        use super::*;

        #[test]
        fn empty_series_is_undefined() {
            assert_eq!(consistency(&[]), None);
        }

        #[test]
        fn caller_guards_empty_series() {
            let shown = consistency(&[])
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "n/a".to_string());
            assert_eq!(shown, "n/a");
        }

        #[test]
        fn rounds_to_nearest_percent() {
            let r = record_with(&["2024-03-01", "2024-03-02", "2024-03-03", "2024-03-04"], 4);
            let series = last_30_days_series(&r.completed_dates, d("2024-03-04"));
            // 4 / 30 = 13.33%
            assert_eq!(consistency(&series), Some(13));
        }

        #[test]
        fn rounds_half_up() {
            let series: Vec<DayPoint> = (0..8)
                .map(|i| DayPoint {
                    date: d("2024-01-01") + Duration::days(i),
                    completed: u8::from(i < 1),
                })
                .collect();
            // 1 / 8 = 12.5%
            assert_eq!(consistency(&series), Some(13));
        }

        #[test]
        fn all_and_none() {
            let today = d("2024-03-30");
            let all: BTreeSet<NaiveDate> = (0..30).map(|i| today - Duration::days(i)).collect();
            assert_eq!(consistency(&last_30_days_series(&all, today)), Some(100));
            assert_eq!(
                consistency(&last_30_days_series(&BTreeSet::new(), today)),
                Some(0)
            );
        }
    }

    mod pattern_tests {
        use super::*;

        #[test]
        fn buckets_by_weekday() {
            // Mon Jan 1, Mon Jan 8, Wed Jan 3, Sun Jan 7
            let r = record_with(&["2024-01-01", "2024-01-08", "2024-01-03", "2024-01-07"], 1);
            let p = weekday_intensity(&r.completed_dates);
            assert_eq!(p.counts, [1, 2, 0, 1, 0, 0, 0]);
            assert_eq!(p.intensities(), [2, 4, 0, 2, 0, 0, 0]);
        }

        #[test]
        fn empty_history_has_zero_intensity() {
            let p = weekday_intensity(&BTreeSet::new());
            assert_eq!(p.counts, [0; 7]);
            assert_eq!(p.intensities(), [0; 7]);
        }
    }

    mod summary_tests {
        use super::*;

        #[test]
        fn best_streak_finds_longest_run() {
            let r = record_with(
                &["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-10", "2024-01-11"],
                2,
            );
            assert_eq!(best_streak(&r.completed_dates), 3);
            assert_eq!(best_streak(&BTreeSet::new()), 0);
        }

        #[test]
        fn level_progress_caps_at_100() {
            assert_eq!(level_progress(0, Level::Beginner), 0);
            assert_eq!(level_progress(10, Level::Beginner), 50);
            assert_eq!(level_progress(10, Level::Intermediate), 25);
            assert_eq!(level_progress(90, Level::Advanced), 100);
        }

        #[test]
        fn completed_in_month_counts_only_that_month() {
            let r = record_with(&["2024-02-28", "2024-03-01", "2024-03-15", "2023-03-02"], 1);
            assert_eq!(completed_in_month(&r.completed_dates, 2024, 2), 2);
            assert_eq!(completed_in_month(&r.completed_dates, 2024, 1), 1);
        }

        #[test]
        fn month_options_walk_back_across_years() {
            let opts = month_options(d("2024-02-10"), 4);
            assert_eq!(opts, vec![(2024, 1), (2024, 0), (2023, 11), (2023, 10)]);
        }

        #[test]
        fn summarize_empty_record() {
            let s = summarize(&CompletionRecord::default(), d("2024-03-01"));
            assert_eq!(s.streak, 0);
            assert_eq!(s.best_streak, 0);
            assert_eq!(s.goal, 20);
            assert_eq!(s.this_month, 0);
            assert_eq!(s.consistency, Some(0));
        }

        #[test]
        fn summarize_reports_stored_streak() {
            let r = record_with(&["2024-03-01", "2024-03-02"], 2);
            let s = summarize(&r, d("2024-03-02"));
            assert_eq!(s.streak, 2);
            assert_eq!(s.best_streak, 2);
            assert_eq!(s.total_completed, 2);
            assert_eq!(s.goal_progress, 10);
            assert_eq!(s.this_month, 2);
            // 2 / 30 = 6.67%
            assert_eq!(s.consistency, Some(7));
        }
    }
}
