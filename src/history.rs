//! Daily practice history for heatmap rendering.
//!
//! Merges two independent activity sources (spaced-repetition reviews and
//! exercise attempts) by UTC calendar date, attaches per-day study minutes,
//! and grades each day on a relative 0-4 scale against the busiest day in
//! the query window.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::types::{ActivityThresholds, DailyActivity, Rating, ReviewLog};

/// Build the per-day activity series for the trailing `weeks` weeks, oldest
/// day first, today inclusive.
///
/// Timestamps are truncated to UTC calendar dates, consistent with the rest
/// of the crate's timestamp handling.
pub fn get_practice_history(
    weeks: u32,
    review_times: &[DateTime<Utc>],
    exercise_times: &[DateTime<Utc>],
    minutes_by_date: &HashMap<NaiveDate, u32>,
    today: NaiveDate,
    thresholds: &ActivityThresholds,
) -> Vec<DailyActivity> {
    let days = u64::from(weeks) * 7;
    if days == 0 {
        return Vec::new();
    }
    let start = today - Days::new(days - 1);

    let mut reviews: HashMap<NaiveDate, u32> = HashMap::new();
    for t in review_times {
        let date = t.date_naive();
        if date >= start && date <= today {
            *reviews.entry(date).or_default() += 1;
        }
    }
    let mut exercises: HashMap<NaiveDate, u32> = HashMap::new();
    for t in exercise_times {
        let date = t.date_naive();
        if date >= start && date <= today {
            *exercises.entry(date).or_default() += 1;
        }
    }

    let totals: Vec<(NaiveDate, u32, u32)> = (0..days)
        .map(|offset| {
            let date = start + Days::new(offset);
            let r = reviews.get(&date).copied().unwrap_or(0);
            let e = exercises.get(&date).copied().unwrap_or(0);
            (date, r, e)
        })
        .collect();
    let max_count = totals.iter().map(|(_, r, e)| r + e).max().unwrap_or(0);

    totals
        .into_iter()
        .map(|(date, r, e)| DailyActivity {
            date,
            reviews: r,
            exercises: e,
            total: r + e,
            minutes: minutes_by_date.get(&date).copied().unwrap_or(0),
            level: calculate_activity_level(r + e, max_count, thresholds),
        })
        .collect()
}

/// Grade a day's practice volume against the busiest day in the window.
///
/// Level 0 is reserved for zero activity; any nonzero count earns at least
/// level 1. The scale is relative, so the same absolute count can map to
/// different levels across different query windows.
pub fn calculate_activity_level(count: u32, max_count: u32, thresholds: &ActivityThresholds) -> u8 {
    if count == 0 || max_count == 0 {
        return 0;
    }
    let ratio = f64::from(count) / f64::from(max_count);
    if ratio >= thresholds.high {
        4
    } else if ratio >= thresholds.medium_high {
        3
    } else if ratio >= thresholds.medium {
        2
    } else {
        1
    }
}

/// Share of logged reviews that were successful recalls (rated Good or
/// better). Returns 0.0 for an empty history.
pub fn retention_rate(logs: &[ReviewLog]) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }
    let successful = logs
        .iter()
        .filter(|log| log.rating >= Rating::Good)
        .count();
    successful as f64 / logs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardStatus;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
    }

    fn at_noon(date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(12, 0, 0).unwrap().and_utc()
    }

    fn history(
        weeks: u32,
        reviews: &[DateTime<Utc>],
        exercises: &[DateTime<Utc>],
    ) -> Vec<DailyActivity> {
        get_practice_history(
            weeks,
            reviews,
            exercises,
            &HashMap::new(),
            today(),
            &ActivityThresholds::default(),
        )
    }

    #[test]
    fn one_entry_per_day_oldest_first() {
        let series = history(2, &[], &[]);
        assert_eq!(series.len(), 14);
        assert_eq!(series[0].date, today() - Days::new(13));
        assert_eq!(series[13].date, today());
        assert!(series.iter().all(|d| d.level == 0 && d.total == 0));
    }

    #[test]
    fn reviews_and_exercises_merge_by_date() {
        let d = today() - Days::new(1);
        let reviews = vec![at_noon(d), at_noon(d), at_noon(today())];
        let exercises = vec![at_noon(d)];

        let series = history(1, &reviews, &exercises);
        let yesterday = series.iter().find(|e| e.date == d).unwrap();
        assert_eq!(yesterday.reviews, 2);
        assert_eq!(yesterday.exercises, 1);
        assert_eq!(yesterday.total, 3);

        let last = series.last().unwrap();
        assert_eq!(last.total, 1);
    }

    #[test]
    fn timestamps_truncate_to_utc_dates() {
        // One minute before and after UTC midnight land on different days.
        let before = Utc.with_ymd_and_hms(2026, 8, 25, 23, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 8, 26, 0, 1, 0).unwrap();

        let series = history(1, &[before, after], &[]);
        let day_25 = series.iter().find(|e| e.date == today() - Days::new(1)).unwrap();
        let day_26 = series.iter().find(|e| e.date == today()).unwrap();
        assert_eq!(day_25.reviews, 1);
        assert_eq!(day_26.reviews, 1);
    }

    #[test]
    fn activity_outside_the_window_is_dropped() {
        let old = at_noon(today() - Days::new(8));
        let series = history(1, &[old], &[]);
        assert!(series.iter().all(|d| d.total == 0));
    }

    #[test]
    fn minutes_attach_from_the_time_log() {
        let mut minutes = HashMap::new();
        minutes.insert(today(), 42);

        let series = get_practice_history(
            1,
            &[at_noon(today())],
            &[],
            &minutes,
            today(),
            &ActivityThresholds::default(),
        );
        assert_eq!(series.last().unwrap().minutes, 42);
        assert_eq!(series[0].minutes, 0);
    }

    #[test]
    fn levels_scale_relative_to_busiest_day() {
        // 8 reviews on the busiest day, 1 on a quiet day.
        let busy = today() - Days::new(2);
        let quiet = today() - Days::new(4);
        let mut reviews = vec![at_noon(busy); 8];
        reviews.push(at_noon(quiet));

        let series = history(1, &reviews, &[]);
        let busy_day = series.iter().find(|e| e.date == busy).unwrap();
        let quiet_day = series.iter().find(|e| e.date == quiet).unwrap();
        assert_eq!(busy_day.level, 4);
        assert_eq!(quiet_day.level, 1);
    }

    #[test]
    fn activity_level_zero_iff_no_activity() {
        let t = ActivityThresholds::default();
        assert_eq!(calculate_activity_level(0, 10, &t), 0);
        assert_eq!(calculate_activity_level(0, 0, &t), 0);
        assert_eq!(calculate_activity_level(5, 0, &t), 0);
        for count in 1..=10 {
            assert!(calculate_activity_level(count, 10, &t) >= 1);
        }
    }

    #[test]
    fn activity_level_is_monotonic_in_count() {
        let t = ActivityThresholds::default();
        let mut previous = 0;
        for count in 0..=20 {
            let level = calculate_activity_level(count, 20, &t);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(calculate_activity_level(20, 20, &t), 4);
    }

    #[test]
    fn activity_level_threshold_boundaries() {
        let t = ActivityThresholds::default();
        assert_eq!(calculate_activity_level(75, 100, &t), 4);
        assert_eq!(calculate_activity_level(74, 100, &t), 3);
        assert_eq!(calculate_activity_level(50, 100, &t), 3);
        assert_eq!(calculate_activity_level(49, 100, &t), 2);
        assert_eq!(calculate_activity_level(25, 100, &t), 2);
        assert_eq!(calculate_activity_level(24, 100, &t), 1);
    }

    fn log_with_rating(rating: Rating) -> ReviewLog {
        let now = Utc::now();
        ReviewLog {
            rating,
            status_before: CardStatus::Review,
            status_after: CardStatus::Review,
            difficulty_before: Some(0.5),
            difficulty_after: Some(0.5),
            stability_before: Some(5.0),
            stability_after: Some(7.0),
            scheduled_days: 7,
            elapsed_days: 5.0,
            review_time: now - Duration::days(1),
        }
    }

    #[test]
    fn retention_counts_good_and_easy_as_recalled() {
        let logs = vec![
            log_with_rating(Rating::Again),
            log_with_rating(Rating::Hard),
            log_with_rating(Rating::Good),
            log_with_rating(Rating::Easy),
        ];
        assert_eq!(retention_rate(&logs), 0.5);
        assert_eq!(retention_rate(&[]), 0.0);
    }
}
