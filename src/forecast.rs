//! Upcoming review load, bucketed for dashboards.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CardState;

/// Counts of actively-scheduled cards per due-date bucket.
///
/// Buckets are half-open windows relative to the as-of day's UTC midnight, so
/// every reviewed card lands in exactly one bucket and the counts sum to the
/// reviewed-card total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewForecast {
    pub overdue: usize,
    pub today: usize,
    pub tomorrow: usize,
    pub this_week: usize,
    pub later: usize,
}

impl ReviewForecast {
    /// Total reviewed cards across all buckets.
    pub fn total(&self) -> usize {
        self.overdue + self.today + self.tomorrow + self.this_week + self.later
    }
}

/// Bucket upcoming due dates relative to `as_of`.
///
/// New cards (never reviewed) have not entered active scheduling and are
/// excluded entirely.
pub fn get_review_forecast(cards: &[CardState], as_of: DateTime<Utc>) -> ReviewForecast {
    let today_start = as_of
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();
    let tomorrow_start = today_start + Duration::days(1);
    let day_after_start = today_start + Duration::days(2);
    let week_end = today_start + Duration::days(7);

    let mut forecast = ReviewForecast::default();
    for card in cards.iter().filter(|c| !c.is_new()) {
        if card.due < today_start {
            forecast.overdue += 1;
        } else if card.due < tomorrow_start {
            forecast.today += 1;
        } else if card.due < day_after_start {
            forecast.tomorrow += 1;
        } else if card.due < week_end {
            forecast.this_week += 1;
        } else {
            forecast.later += 1;
        }
    }
    forecast
}
