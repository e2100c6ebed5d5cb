//! FSRS (Free Spaced Repetition Scheduler) engine.
//!
//! Models memory with the DSR triple:
//! - Difficulty (D): intrinsic card difficulty, 1-10 internally, stored
//!   normalized to [0, 1] on the card
//! - Stability (S): days until recall probability drops to target retention
//! - Retrievability (R): current probability of recall
//!
//! `review()` is the single mutation path for card state: it applies the
//! forgetting-curve update, runs the status machine, sizes the next interval
//! from the desired retention, and emits an immutable `ReviewLog`.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::types::{CardState, CardStatus, Rating, ReviewLog, SchedulerConfig};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// FSRS-4.5 default parameters (17 weights).
const DEFAULT_WEIGHTS: [f64; 17] = [
    0.4, 0.6, 2.4, 5.8, // w[0-3]: initial stability for Again, Hard, Good, Easy
    4.93, // w[4]: initial difficulty base
    0.94, // w[5]: initial difficulty modifier
    0.86, // w[6]: difficulty decay
    0.01, // w[7]: mean reversion weight
    1.49, // w[8]: stability exp base
    0.14, // w[9]: stability decay
    0.94, // w[10]: retrievability effect
    2.18, // w[11]: forget stability base
    0.05, // w[12]: difficulty on forget
    0.34, // w[13]: stability on forget
    1.26, // w[14]: retrievability on forget
    0.29, // w[15]: hard penalty
    2.61, // w[16]: easy bonus
];

/// Spaced-repetition scheduler over the FSRS forgetting-curve model.
///
/// Policy knobs are fixed at construction; build one scheduler per desired
/// retention policy. The scheduler holds no mutable state and is safe to
/// share across threads.
#[derive(Debug, Clone)]
pub struct FsrsScheduler {
    config: SchedulerConfig,
    w: [f64; 17],
}

impl Default for FsrsScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl FsrsScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            w: DEFAULT_WEIGHTS,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Apply one review to a card, producing the next state and its audit log.
    ///
    /// Timestamps must be timezone-aware UTC throughout; `reps` increments on
    /// every call, `lapses` only when a Review-state card is rated Again.
    pub fn review(
        &self,
        card: &CardState,
        rating: Rating,
        review_time: DateTime<Utc>,
    ) -> (CardState, ReviewLog) {
        let elapsed_days = card
            .last_review
            .map(|last| (review_time - last).num_seconds() as f64 / SECONDS_PER_DAY)
            .unwrap_or(0.0)
            .max(0.0);

        let (new_stability, new_difficulty, status_after) = if card.is_new() {
            // First review of any card lands in Learning regardless of rating.
            (
                self.initial_stability(rating),
                self.initial_difficulty(rating),
                CardStatus::Learning,
            )
        } else {
            debug_assert!(
                card.stability.is_some() && card.difficulty.is_some(),
                "reviewed card missing memory model"
            );
            let stability = card.stability.unwrap_or(1.0);
            let difficulty = card.difficulty.map(difficulty_from_unit).unwrap_or(5.0);

            let retrievability = forgetting_curve(elapsed_days, stability);
            let next_d = self.next_difficulty(difficulty, rating);
            let next_s = if rating == Rating::Again {
                self.next_stability_forget(stability, difficulty, retrievability)
            } else {
                self.next_stability_recall(stability, difficulty, retrievability, rating)
            };
            (next_s, next_d, next_status(card.status, rating))
        };

        // A lapse is forgetting something already learned, not failing while
        // still consolidating.
        let lapses = if rating == Rating::Again && card.status == CardStatus::Review {
            card.lapses + 1
        } else {
            card.lapses
        };

        let due = if rating == Rating::Again {
            review_time + Duration::minutes(self.short_term_minutes(new_stability))
        } else {
            review_time + Duration::days(self.interval_days(new_stability))
        };
        let scheduled_days = (due - review_time).num_days().max(0);

        debug!(
            rating = rating.to_value(),
            status_before = ?card.status,
            status_after = ?status_after,
            stability = new_stability,
            scheduled_days,
            "scheduled review"
        );

        let new_state = CardState {
            status: status_after,
            difficulty: Some(difficulty_to_unit(new_difficulty)),
            stability: Some(new_stability),
            due,
            last_review: Some(review_time),
            reps: card.reps + 1,
            lapses,
            scheduled_days,
        };

        let log = ReviewLog {
            rating,
            status_before: card.status,
            status_after,
            difficulty_before: card.difficulty,
            difficulty_after: new_state.difficulty,
            stability_before: card.stability,
            stability_after: new_state.stability,
            scheduled_days,
            elapsed_days,
            review_time,
        };

        (new_state, log)
    }

    /// Estimated current recall probability, in [0, 1].
    ///
    /// A never-reviewed card has no decay to model and returns 1.0.
    pub fn retrievability(&self, card: &CardState, now: DateTime<Utc>) -> f64 {
        let (Some(stability), Some(last)) = (card.stability, card.last_review) else {
            return 1.0;
        };
        let elapsed = ((now - last).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);
        forgetting_curve(elapsed, stability).clamp(0.0, 1.0)
    }

    /// Initial stability for a new card based on first rating.
    /// S0(G) = w[G-1]
    fn initial_stability(&self, rating: Rating) -> f64 {
        self.w[(rating.to_value() - 1) as usize].max(0.1)
    }

    /// Initial difficulty for a new card based on first rating.
    /// D0(G) = w[4] - w[5] * (G - 3)
    fn initial_difficulty(&self, rating: Rating) -> f64 {
        let d0 = self.w[4] - self.w[5] * (rating.to_value() as f64 - 3.0);
        d0.clamp(1.0, 10.0)
    }

    /// Next difficulty via mean reversion toward D0, then rating decay.
    /// D' = w[7] * D0(G) + (1 - w[7]) * D; D'' = D' - w[6] * (G - 3)
    fn next_difficulty(&self, current: f64, rating: Rating) -> f64 {
        let d0 = self.initial_difficulty(rating);
        let reverted = self.w[7] * d0 + (1.0 - self.w[7]) * current;
        (reverted - self.w[6] * (rating.to_value() as f64 - 3.0)).clamp(1.0, 10.0)
    }

    /// Next stability after successful recall.
    /// S' = S * (e^w[8] * (11 - D) * S^-w[9] * (e^(w[10]*(1-R)) - 1) + 1) * modifier
    fn next_stability_recall(
        &self,
        stability: f64,
        difficulty: f64,
        retrievability: f64,
        rating: Rating,
    ) -> f64 {
        let growth = self.w[8].exp()
            * (11.0 - difficulty).max(0.1)
            * stability.powf(-self.w[9])
            * ((self.w[10] * (1.0 - retrievability)).exp() - 1.0)
            + 1.0;

        let modifier = match rating {
            Rating::Hard => self.w[15],
            Rating::Easy => self.w[16],
            _ => 1.0,
        };

        (stability * growth * modifier).max(0.1)
    }

    /// Next stability after forgetting.
    /// S' = w[11] * D^-w[12] * ((S+1)^w[13] - 1) * e^(w[14]*(1-R))
    fn next_stability_forget(&self, stability: f64, difficulty: f64, retrievability: f64) -> f64 {
        let next = self.w[11]
            * difficulty.max(1.0).powf(-self.w[12])
            * ((stability + 1.0).powf(self.w[13]) - 1.0)
            * (self.w[14] * (1.0 - retrievability)).exp();
        // A lapse never leaves the card more stable than before.
        next.max(0.1).min(stability)
    }

    /// Interval at which predicted recall falls to the desired retention.
    /// I = 9 * S * (1/R - 1), rounded down, at least one day, capped.
    fn interval_days(&self, stability: f64) -> i64 {
        let retention = self.config.desired_retention;
        if retention <= 0.0 || retention >= 1.0 {
            return (stability.floor() as i64).clamp(1, self.config.maximum_interval);
        }
        let interval = 9.0 * stability * (1.0 / retention - 1.0);
        (interval.floor() as i64).clamp(1, self.config.maximum_interval)
    }

    /// Short re-learning interval after an Again rating: sub-day, scaled by
    /// stability, between ten minutes and one day.
    fn short_term_minutes(&self, stability: f64) -> i64 {
        (stability * 60.0).clamp(10.0, 1440.0) as i64
    }
}

/// Exponential forgetting curve: R(t, S) = (1 + t / (9S))^-1.
fn forgetting_curve(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + elapsed_days / (9.0 * stability)).powf(-1.0)
}

/// Status transition table. First reviews are handled separately in
/// `review()`; a nominally New card that somehow reaches here is treated as
/// still consolidating.
fn next_status(current: CardStatus, rating: Rating) -> CardStatus {
    match (current, rating) {
        (CardStatus::New, _) => CardStatus::Learning,
        (CardStatus::Learning, Rating::Again | Rating::Hard) => CardStatus::Learning,
        (CardStatus::Learning, _) => CardStatus::Review,
        (CardStatus::Review, Rating::Again) => CardStatus::Relearning,
        (CardStatus::Review, _) => CardStatus::Review,
        (CardStatus::Relearning, Rating::Again | Rating::Hard) => CardStatus::Relearning,
        (CardStatus::Relearning, _) => CardStatus::Review,
    }
}

/// Map internal FSRS difficulty (1-10) to the stored [0, 1] scale.
fn difficulty_to_unit(difficulty: f64) -> f64 {
    ((difficulty - 1.0) / 9.0).clamp(0.0, 1.0)
}

/// Map the stored [0, 1] difficulty back to the FSRS 1-10 scale.
fn difficulty_from_unit(unit: f64) -> f64 {
    1.0 + 9.0 * unit.clamp(0.0, 1.0)
}
