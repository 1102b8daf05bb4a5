//! Tiered retention selection over a time-sorted file list
//!
//! All tiers share one scan: a cursor that only moves forward and a rolling
//! bucket boundary handed from tier to tier. Six "keep N per bucket" rules
//! therefore cost a single linear pass, and no file is ever examined twice.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Weekday;
use tracing::debug;

use crate::interval::{interval_end, interval_start, Interval, MAX_TIMESTAMP_MS};
use crate::policy::KeepPolicy;

/// A file under consideration for retention, captured once per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Full path, used for deletion
    pub path: PathBuf,
    /// File name, used for filtering and display
    pub name: String,
    /// Last access time in Unix milliseconds
    pub accessed_ms: i64,
    /// Size in bytes, reported as space freed after deletion
    pub len: u64,
}

/// Scan position shared by every tier of one retention pass: the cursor
/// into the sorted file list and the rolling bucket boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanState {
    cursor: usize,
    window_boundary_ms: i64,
}

impl ScanState {
    fn new() -> Self {
        Self { cursor: 0, window_boundary_ms: MAX_TIMESTAMP_MS }
    }
}

/// Outcome of one retention pass over a directory's candidates.
#[derive(Debug, Clone, Default)]
pub struct PrunePlan {
    /// Files to keep, newest first
    pub keep: Vec<CandidateFile>,
    /// Files to delete, newest first
    pub remove: Vec<CandidateFile>,
}

/// Indices of the files to retain under `keep`.
///
/// `files` must already be sorted by `accessed_ms` descending; equal
/// timestamps keep their input order. Tiers run Last, Hourly, Daily,
/// Weekly, Monthly, Yearly; each file is visited exactly once across the
/// whole pass, so a file passed over by one tier is never reconsidered by
/// a later one.
pub fn select_retained(
    files: &[CandidateFile],
    keep: &KeepPolicy,
    week_start: Weekday,
) -> HashSet<usize> {
    debug_assert!(
        files.windows(2).all(|pair| pair[0].accessed_ms >= pair[1].accessed_ms),
        "candidate files must be sorted newest first"
    );

    let mut retained = HashSet::new();
    let mut state = ScanState::new();

    for (interval, count) in keep.rules() {
        if count < 1 {
            continue;
        }
        state = scan_tier(files, interval, count, week_start, state, &mut retained);
        debug!(
            ?interval,
            cursor = state.cursor,
            retained = retained.len(),
            "tier scan complete"
        );
    }

    retained
}

fn scan_tier(
    files: &[CandidateFile],
    interval: Interval,
    keep_count: u32,
    week_start: Weekday,
    mut state: ScanState,
    retained: &mut HashSet<usize>,
) -> ScanState {
    // An earlier tier's last retention left the boundary inside a bucket it
    // already owns. Step to one millisecond before this tier's bucket start
    // so that bucket is not claimed a second time.
    if !retained.is_empty() {
        state.window_boundary_ms =
            interval_start(interval, state.window_boundary_ms, 0, week_start) - 1;
    }

    let mut kept = 0u32;
    while state.cursor < files.len() && kept < keep_count {
        let bucket_start = interval_start(interval, state.window_boundary_ms, 0, week_start);
        let bucket_end = interval_end(interval, bucket_start, week_start);

        let index = state.cursor;
        let file = &files[index];
        state.cursor += 1;

        if interval == Interval::Last || file.accessed_ms <= bucket_end {
            retained.insert(index);
            // Next bucket to fill is the one strictly before this file's own.
            state.window_boundary_ms =
                interval_start(interval, file.accessed_ms, -1, week_start);
            kept += 1;
        }
    }

    state
}

/// Partition `files` (sorted newest first) into keep and remove lists.
pub fn plan(files: Vec<CandidateFile>, keep: &KeepPolicy, week_start: Weekday) -> PrunePlan {
    let retained = select_retained(&files, keep, week_start);

    let mut plan = PrunePlan {
        keep: Vec::with_capacity(retained.len()),
        remove: Vec::with_capacity(files.len() - retained.len()),
    };
    for (index, file) in files.into_iter().enumerate() {
        if retained.contains(&index) {
            plan.keep.push(file);
        } else {
            plan.remove.push(file);
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn file_at(ts_ms: i64, name: &str) -> CandidateFile {
        CandidateFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            accessed_ms: ts_ms,
            len: 1024,
        }
    }

    fn ymd_hms(year: i32, month: u32, day: u32, hour: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    /// One file every four hours, 2023-07-15 through 2023-07-28, newest
    /// first: 84 files over two weeks.
    fn fixture_files() -> Vec<CandidateFile> {
        let mut files = Vec::new();
        for day in (15..29).rev() {
            for hour in [20, 16, 12, 8, 4, 0] {
                let name = format!("file_created_2023-07-{day:02}_{hour:02}-00-00.txt");
                files.push(file_at(ymd_hms(2023, 7, day, hour), &name));
            }
        }
        files
    }

    fn kept_names(files: Vec<CandidateFile>, keep: &KeepPolicy, week_start: Weekday) -> Vec<String> {
        let plan = plan(files, keep, week_start);
        plan.keep.into_iter().map(|file| file.name).collect()
    }

    #[test]
    fn test_empty_policy_removes_everything() {
        let plan = plan(fixture_files(), &KeepPolicy::default(), Weekday::Sun);
        assert!(plan.keep.is_empty());
        assert_eq!(plan.remove.len(), 84);
    }

    #[test]
    fn test_keep_last_hourly_weekly() {
        let keep = KeepPolicy { last: 2, hourly: 3, weekly: 1, ..KeepPolicy::default() };

        let names = kept_names(fixture_files(), &keep, Weekday::Mon);

        assert_eq!(
            names,
            vec![
                // Two most recent, unconditionally
                "file_created_2023-07-28_20-00-00.txt",
                "file_created_2023-07-28_16-00-00.txt",
                // Three next distinct hours
                "file_created_2023-07-28_12-00-00.txt",
                "file_created_2023-07-28_08-00-00.txt",
                "file_created_2023-07-28_04-00-00.txt",
                // Newest file of the previous week (weeks start Monday)
                "file_created_2023-07-23_20-00-00.txt",
            ]
        );
    }

    #[test]
    fn test_keep_last_hourly_weekly_sunday_weeks() {
        let keep = KeepPolicy { last: 2, hourly: 3, weekly: 1, ..KeepPolicy::default() };

        let names = kept_names(fixture_files(), &keep, Weekday::Sun);

        // With Sunday weeks, July 23 belongs to the current week, so the
        // weekly tier reaches back to the 22nd.
        assert_eq!(names.len(), 6);
        assert_eq!(names[5], "file_created_2023-07-22_20-00-00.txt");
    }

    #[test]
    fn test_keep_last_daily_monthly() {
        let keep = KeepPolicy { last: 1, daily: 3, monthly: 2, ..KeepPolicy::default() };

        let names = kept_names(fixture_files(), &keep, Weekday::Sun);

        // The monthly tier contributes nothing: every candidate falls in a
        // month already represented, and the scan is exhausted.
        assert_eq!(
            names,
            vec![
                "file_created_2023-07-28_20-00-00.txt",
                "file_created_2023-07-27_20-00-00.txt",
                "file_created_2023-07-26_20-00-00.txt",
                "file_created_2023-07-25_20-00-00.txt",
            ]
        );
    }

    #[test]
    fn test_keep_across_four_tiers() {
        let keep =
            KeepPolicy { last: 2, daily: 1, weekly: 1, monthly: 2, ..KeepPolicy::default() };

        let names = kept_names(fixture_files(), &keep, Weekday::Mon);

        assert_eq!(
            names,
            vec![
                "file_created_2023-07-28_20-00-00.txt",
                "file_created_2023-07-28_16-00-00.txt",
                "file_created_2023-07-27_20-00-00.txt",
                "file_created_2023-07-23_20-00-00.txt",
            ]
        );
    }

    #[test]
    fn test_keep_last_exhausts_short_list() {
        let files = vec![
            file_at(ymd_hms(2023, 7, 28, 20), "a"),
            file_at(ymd_hms(2023, 7, 28, 16), "b"),
            file_at(ymd_hms(2023, 7, 28, 12), "c"),
        ];
        let keep = KeepPolicy { last: 100, ..KeepPolicy::default() };

        let plan = plan(files, &keep, Weekday::Sun);
        assert_eq!(plan.keep.len(), 3);
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_no_candidates_is_a_no_op() {
        let keep = KeepPolicy { last: 5, daily: 5, ..KeepPolicy::default() };
        let plan = plan(Vec::new(), &keep, Weekday::Sun);
        assert!(plan.keep.is_empty());
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_timestamp_ties_keep_input_order() {
        let ts = ymd_hms(2023, 7, 28, 20);
        let files = vec![file_at(ts, "first"), file_at(ts, "second"), file_at(ts, "third")];
        let keep = KeepPolicy { last: 1, ..KeepPolicy::default() };

        let names = kept_names(files, &keep, Weekday::Sun);
        assert_eq!(names, vec!["first"]);
    }

    #[test]
    fn test_tier_never_exceeds_keep_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..50 {
            let files = random_files(&mut rng, 120);
            for (keep, interval) in [
                (KeepPolicy { hourly: 4, ..KeepPolicy::default() }, Interval::Hourly),
                (KeepPolicy { daily: 4, ..KeepPolicy::default() }, Interval::Daily),
                (KeepPolicy { weekly: 4, ..KeepPolicy::default() }, Interval::Weekly),
                (KeepPolicy { monthly: 4, ..KeepPolicy::default() }, Interval::Monthly),
                (KeepPolicy { yearly: 4, ..KeepPolicy::default() }, Interval::Yearly),
            ] {
                let retained = select_retained(&files, &keep, Weekday::Sun);
                assert!(retained.len() <= 4);

                // No two retained files may land in the same bucket.
                let buckets: HashSet<i64> = retained
                    .iter()
                    .map(|&index| {
                        interval_start(interval, files[index].accessed_ms, 0, Weekday::Sun)
                    })
                    .collect();
                assert_eq!(buckets.len(), retained.len(), "{interval:?} bucket retained twice");
            }
        }
    }

    #[test]
    fn test_irregular_gaps_still_fill_buckets_newest_first() {
        // Dense recent files, then a nine-month gap, then stragglers.
        let files = vec![
            file_at(ymd_hms(2024, 3, 14, 22), "recent-0"),
            file_at(ymd_hms(2024, 3, 14, 9), "recent-1"),
            file_at(ymd_hms(2024, 3, 11, 7), "recent-2"),
            file_at(ymd_hms(2023, 6, 2, 12), "old-0"),
            file_at(ymd_hms(2023, 6, 1, 4), "old-1"),
            file_at(ymd_hms(2022, 12, 30, 18), "older-0"),
        ];
        let keep = KeepPolicy { daily: 4, ..KeepPolicy::default() };

        let names = kept_names(files, &keep, Weekday::Sun);

        // One per distinct day, walked strictly backwards across the gap.
        assert_eq!(names, vec!["recent-0", "recent-2", "old-0", "old-1"]);
    }

    #[test]
    fn test_disabled_tiers_leave_scan_untouched() {
        // hourly = 0 must not consume files or shift the boundary, so the
        // result equals a policy with the tier absent entirely.
        let with_disabled =
            KeepPolicy { last: 1, hourly: 0, daily: 2, ..KeepPolicy::default() };
        let files = fixture_files();

        let retained = select_retained(&files, &with_disabled, Weekday::Sun);
        let names: Vec<&str> = {
            let mut indices: Vec<usize> = retained.into_iter().collect();
            indices.sort_unstable();
            indices.iter().map(|&index| files[index].name.as_str()).collect()
        };

        assert_eq!(
            names,
            vec![
                "file_created_2023-07-28_20-00-00.txt",
                "file_created_2023-07-27_20-00-00.txt",
                "file_created_2023-07-26_20-00-00.txt",
            ]
        );
    }

    #[test]
    fn test_plan_preserves_newest_first_order() {
        let keep = KeepPolicy { last: 1, daily: 2, ..KeepPolicy::default() };
        let plan = plan(fixture_files(), &keep, Weekday::Sun);

        for pair in plan.keep.windows(2) {
            assert!(pair[0].accessed_ms >= pair[1].accessed_ms);
        }
        for pair in plan.remove.windows(2) {
            assert!(pair[0].accessed_ms >= pair[1].accessed_ms);
        }
        assert_eq!(plan.keep.len() + plan.remove.len(), 84);
    }

    fn random_files(rng: &mut ChaCha8Rng, count: usize) -> Vec<CandidateFile> {
        // Irregular spacing on purpose: gaps range from minutes to months.
        let mut ts = ymd_hms(2024, 6, 1, 0);
        let mut files = Vec::with_capacity(count);
        for index in 0..count {
            ts -= rng.gen_range(60_000i64..5_000_000_000);
            files.push(file_at(ts, &format!("file-{index}")));
        }
        files
    }
}
