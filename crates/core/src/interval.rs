//! Interval bucket calculations over Unix-millisecond timestamps
//!
//! All flooring happens in UTC: hours and days are floored by
//! epoch-millisecond modulo, weeks walk back to a configurable week-start
//! day, months and years use calendar-aware arithmetic.

use chrono::{DateTime, Datelike, Months, TimeZone, Utc, Weekday};

pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;
pub const MS_PER_WEEK: i64 = 604_800_000;

/// Largest timestamp the calculator handles: 9999-12-31T23:59:59.999Z.
/// The retention scan uses it as its initial boundary; it is later than
/// any real file timestamp and still valid for calendar arithmetic.
pub const MAX_TIMESTAMP_MS: i64 = 253_402_300_799_999;

/// Bucket granularity for one retention tier.
///
/// `Last` is the degenerate no-bucketing case: [`interval_start`] returns
/// its input unchanged and the selector keeps files unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Last,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Start of the bucket containing `unix_ms`, shifted by `offset` whole
/// buckets.
///
/// `offset = 0` floors, `-1` is the previous bucket's start, `+1` the
/// next. `week_start` only matters for [`Interval::Weekly`].
///
/// Panics when the timestamp or the shifted result leaves the supported
/// calendar range; callers feed real file timestamps, so hitting this is a
/// programming error rather than a runtime condition.
pub fn interval_start(interval: Interval, unix_ms: i64, offset: i32, week_start: Weekday) -> i64 {
    let offset = i64::from(offset);

    match interval {
        Interval::Last => unix_ms,
        Interval::Hourly => floor_to(unix_ms, MS_PER_HOUR) + offset * MS_PER_HOUR,
        Interval::Daily => floor_to(unix_ms, MS_PER_DAY) + offset * MS_PER_DAY,
        Interval::Weekly => {
            let day = floor_to(unix_ms, MS_PER_DAY);
            let back = days_since_week_start(day, week_start);
            day - back * MS_PER_DAY + offset * MS_PER_WEEK
        }
        Interval::Monthly => {
            let dt = datetime(unix_ms);
            let first = Utc
                .with_ymd_and_hms(dt.year(), dt.month(), 1, 0, 0, 0)
                .single()
                .expect("first of month is unambiguous in UTC");
            shift_months(first, offset).timestamp_millis()
        }
        Interval::Yearly => {
            let dt = datetime(unix_ms);
            let first = Utc
                .with_ymd_and_hms(dt.year(), 1, 1, 0, 0, 0)
                .single()
                .expect("January 1 is unambiguous in UTC");
            shift_months(first, offset * 12).timestamp_millis()
        }
    }
}

/// End of the bucket that starts at `start_ms`: one millisecond before the
/// next bucket begins.
pub fn interval_end(interval: Interval, start_ms: i64, week_start: Weekday) -> i64 {
    interval_start(interval, start_ms, 1, week_start) - 1
}

fn floor_to(unix_ms: i64, bucket_ms: i64) -> i64 {
    unix_ms - unix_ms.rem_euclid(bucket_ms)
}

fn datetime(unix_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(unix_ms)
        .expect("timestamp outside the supported calendar range")
}

/// Days (0-6) to walk back from the day containing `day_start_ms` to reach
/// the configured week-start day, wrapping across the week boundary.
fn days_since_week_start(day_start_ms: i64, week_start: Weekday) -> i64 {
    let day = i64::from(datetime(day_start_ms).weekday().num_days_from_sunday());
    let start = i64::from(week_start.num_days_from_sunday());
    (day - start).rem_euclid(7)
}

fn shift_months(dt: DateTime<Utc>, months: i64) -> DateTime<Utc> {
    let magnitude = u32::try_from(months.unsigned_abs()).expect("month offset out of range");
    let shifted = if months >= 0 {
        dt.checked_add_months(Months::new(magnitude))
    } else {
        dt.checked_sub_months(Months::new(magnitude))
    };
    shifted.expect("month arithmetic outside the supported calendar range")
}
