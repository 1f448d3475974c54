//! FILENAME: core/rollup-engine/src/keys.rs
//! Bucket key functions.
//!
//! Period keys are plain strings so they can travel to the view layer and
//! sort lexicographically where zero-padding allows it:
//! - day:   `YYYY-MM-DD` (local calendar date)
//! - week:  `YYYY-Www`   (ISO-8601 week; ordering uses the (year, week) pair)
//! - month: `YYYY-MM`
//!
//! All keys are derived from the viewer's LOCAL calendar so bucket
//! boundaries match what the user sees on screen, not UTC midnights.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

use crate::definition::Bucket;

/// Local calendar date key, `YYYY-MM-DD`.
pub fn day_key(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Local month key, `YYYY-MM`.
pub fn month_key(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m").to_string()
}

/// ISO-8601 week key, `YYYY-Www`.
///
/// The week belongs to the year of its Thursday: shift the date to the
/// Thursday of its ISO week (weekday 1..=7, Monday=1), then count whole
/// weeks since January 1 of the Thursday's year.
pub fn week_key(ts: &DateTime<Local>) -> String {
    let (year, week) = iso_week_of(ts.date_naive());
    format!("{year}-W{week:02}")
}

fn iso_week_of(date: NaiveDate) -> (i32, u32) {
    let weekday = date.weekday().number_from_monday() as i64; // 1..=7, Sunday=7
    let thursday = date + Duration::days(4 - weekday);
    let jan1 = NaiveDate::from_ymd_opt(thursday.year(), 1, 1)
        .expect("January 1 exists for every year");
    let week = (thursday - jan1).num_days() / 7 + 1;
    (thursday.year(), week as u32)
}

/// Key for an arbitrary granularity.
pub fn bucket_key(ts: &DateTime<Local>, bucket: Bucket) -> String {
    match bucket {
        Bucket::Day => day_key(ts),
        Bucket::Week => week_key(ts),
        Bucket::Month => month_key(ts),
    }
}

/// Re-keys a day key under a coarser granularity. Used when day-level points
/// are re-grouped instead of re-walking the raw rows. Returns None for a
/// malformed day key, or when the target granularity is Day itself.
pub fn coarsen_day_key(day: &str, bucket: Bucket) -> Option<String> {
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    match bucket {
        Bucket::Day => None,
        Bucket::Week => {
            let (year, week) = iso_week_of(date);
            Some(format!("{year}-W{week:02}"))
        }
        Bucket::Month => Some(format!("{:04}-{:02}", date.year(), date.month())),
    }
}

/// Sort pair for a week key. Week keys compare by (year, week number);
/// zero-padding makes the lexicographic order agree, but ordering goes
/// through the pair so a non-padded key can never slip out of place.
pub fn week_sort_pair(key: &str) -> Option<(i32, u32)> {
    let (year, week) = key.split_once("-W")?;
    Some((year.parse().ok()?, week.parse().ok()?))
}
