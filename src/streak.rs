//! Practice streak tracking.
//!
//! Works over distinct practice dates (the "did the user do anything that
//! day" signal); callers derive those from completed sessions however they
//! store them.

use chrono::{Days, NaiveDate};

use crate::types::{StreakConfig, StreakData};

/// Compute streak statistics for a set of practice dates.
///
/// Input dates may arrive in any order and may contain duplicates; they are
/// deduplicated and sorted internally. The current streak only counts if it
/// reaches today or yesterday; anything older has lapsed to zero regardless
/// of past activity.
pub fn get_streak_data(
    practice_dates: &[NaiveDate],
    today: NaiveDate,
    config: &StreakConfig,
) -> StreakData {
    let mut dates: Vec<NaiveDate> = practice_dates.to_vec();
    dates.sort_unstable();
    dates.dedup();

    let current_streak = current_streak(&dates, today);
    let longest_streak = longest_streak(&dates);
    let is_active_today = dates.binary_search(&today).is_ok();

    let streak_start = (current_streak > 0).then(|| {
        let anchor = if is_active_today {
            today
        } else {
            today - Days::new(1)
        };
        anchor - Days::new(u64::from(current_streak) - 1)
    });

    let milestones_reached: Vec<u32> = config
        .milestones
        .iter()
        .copied()
        .filter(|&m| longest_streak >= m)
        .collect();
    let next_milestone = config
        .milestones
        .iter()
        .copied()
        .filter(|&m| m > current_streak)
        .min();

    let week_start = today - Days::new(6);
    let month_start = today - Days::new(29);
    let days_this_week = dates
        .iter()
        .filter(|&&d| d >= week_start && d <= today)
        .count() as u32;
    let days_this_month = dates
        .iter()
        .filter(|&&d| d >= month_start && d <= today)
        .count() as u32;

    StreakData {
        current_streak,
        longest_streak,
        streak_start,
        is_active_today,
        milestones_reached,
        next_milestone,
        days_this_week,
        days_this_month,
    }
}

/// Consecutive-day run ending at today or yesterday. `dates` must be sorted
/// ascending and deduplicated.
fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&most_recent) = dates.last() else {
        return 0;
    };
    let yesterday = today - Days::new(1);
    if most_recent != today && most_recent != yesterday {
        return 0;
    }

    let mut streak = 1u32;
    let mut expected = most_recent - Days::new(1);
    for &date in dates.iter().rev().skip(1) {
        if date == expected {
            streak += 1;
            expected = date - Days::new(1);
        } else {
            break;
        }
    }
    streak
}

/// Longest run of contiguous dates anywhere in the history. `dates` must be
/// sorted ascending and deduplicated.
fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates {
        run = match previous {
            Some(prev) if date == prev + Days::new(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today() - Days::new(n)
    }

    fn streak(dates: &[NaiveDate]) -> StreakData {
        get_streak_data(dates, today(), &StreakConfig::default())
    }

    #[test]
    fn empty_history_has_no_streak() {
        let data = streak(&[]);
        assert_eq!(data.current_streak, 0);
        assert_eq!(data.longest_streak, 0);
        assert_eq!(data.streak_start, None);
        assert!(!data.is_active_today);
        assert_eq!(data.days_this_week, 0);
        assert_eq!(data.days_this_month, 0);
    }

    #[test]
    fn single_practice_today() {
        let data = streak(&[today()]);
        assert_eq!(data.current_streak, 1);
        assert_eq!(data.longest_streak, 1);
        assert!(data.is_active_today);
        assert_eq!(data.streak_start, Some(today()));
    }

    #[test]
    fn streak_survives_a_missed_today() {
        // Practiced yesterday but not yet today: streak still alive.
        let data = streak(&[days_ago(1), days_ago(2)]);
        assert_eq!(data.current_streak, 2);
        assert!(!data.is_active_today);
        assert_eq!(data.streak_start, Some(days_ago(2)));
    }

    #[test]
    fn gap_of_one_full_day_lapses_the_streak() {
        let data = streak(&[days_ago(2)]);
        assert_eq!(data.current_streak, 0);
        assert_eq!(data.streak_start, None);
        // Past activity still counts toward the longest streak.
        assert_eq!(data.longest_streak, 1);
    }

    #[test]
    fn three_consecutive_days() {
        let data = streak(&[today(), days_ago(1), days_ago(2)]);
        assert_eq!(data.current_streak, 3);
        assert!(data.longest_streak >= 3);
        assert_eq!(data.streak_start, Some(days_ago(2)));
    }

    #[test]
    fn longest_streak_ignores_current_lapse() {
        // Ten-day run long ago, then nothing.
        let old_run: Vec<NaiveDate> = (20..30).map(days_ago).collect();
        let data = streak(&old_run);
        assert_eq!(data.current_streak, 0);
        assert_eq!(data.longest_streak, 10);
    }

    #[test]
    fn current_streak_stops_at_first_gap() {
        let dates = [today(), days_ago(1), days_ago(3), days_ago(4)];
        let data = streak(&dates);
        assert_eq!(data.current_streak, 2);
        assert_eq!(data.longest_streak, 2);
    }

    #[test]
    fn input_order_and_duplicates_do_not_matter() {
        let shuffled = [days_ago(1), today(), days_ago(2), today(), days_ago(1)];
        let data = streak(&shuffled);
        assert_eq!(data.current_streak, 3);
        assert_eq!(data.days_this_week, 3);
    }

    #[test]
    fn milestones_track_longest_and_next_tracks_current() {
        let run: Vec<NaiveDate> = (0..8).map(days_ago).collect();
        let data = streak(&run);
        assert_eq!(data.current_streak, 8);
        assert_eq!(data.milestones_reached, vec![7]);
        assert_eq!(data.next_milestone, Some(30));
    }

    #[test]
    fn next_milestone_is_none_beyond_the_largest() {
        let config = StreakConfig {
            milestones: vec![3, 5],
        };
        let run: Vec<NaiveDate> = (0..6).map(days_ago).collect();
        let data = get_streak_data(&run, today(), &config);
        assert_eq!(data.milestones_reached, vec![3, 5]);
        assert_eq!(data.next_milestone, None);
    }

    #[test]
    fn trailing_window_counts() {
        // Every other day for the last 30 days.
        let dates: Vec<NaiveDate> = (0..15).map(|i| days_ago(i * 2)).collect();
        let data = streak(&dates);
        assert_eq!(data.days_this_week, 4); // days 0, 2, 4, 6 ago
        assert_eq!(data.days_this_month, 15);
    }

    #[test]
    fn streak_data_serializes_iso_dates() {
        let data = streak(&[today()]);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["streak_start"], "2026-08-26");
        assert_eq!(json["current_streak"], 1);
    }
}
