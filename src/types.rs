//! Core types for the learning subsystem.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Card learning status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::New
    }
}

/// Rating for a review. Ordinal: Again is worst, Easy is best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Map a binary self-grade onto the 4-point scale.
    /// Wrong -> Again, correct -> Good.
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Good } else { Self::Again }
    }

    /// Whether this rating counts as a successful recall (Good or Easy).
    pub fn is_successful(self) -> bool {
        self >= Self::Good
    }
}

/// One card's memory model as tracked by the scheduler.
///
/// A card is either wholly new (no `last_review`, no `stability`/`difficulty`)
/// or carries a full memory model. `due` is always present; a freshly created
/// card is due immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardState {
    pub status: CardStatus,
    /// Intrinsic recall difficulty, normalized to [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    /// Days until recall probability decays to the target retention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    pub due: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub reps: u32,
    pub lapses: u32,
    /// Interval chosen by the most recent scheduling decision, in whole days.
    pub scheduled_days: i64,
}

impl CardState {
    /// Initial state for a card that has never been reviewed: due now.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: CardStatus::New,
            difficulty: None,
            stability: None,
            due: now,
            last_review: None,
            reps: 0,
            lapses: 0,
            scheduled_days: 0,
        }
    }

    /// Whether this card has ever been reviewed. Keyed off `last_review`
    /// alone, independent of the nominal status.
    pub fn is_new(&self) -> bool {
        self.last_review.is_none()
    }
}

/// Immutable audit record of one review transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLog {
    pub rating: Rating,
    pub status_before: CardStatus,
    pub status_after: CardStatus,
    pub difficulty_before: Option<f64>,
    pub difficulty_after: Option<f64>,
    pub stability_before: Option<f64>,
    pub stability_after: Option<f64>,
    pub scheduled_days: i64,
    /// Days since the previous review; 0.0 for a first review.
    pub elapsed_days: f64,
    pub review_time: DateTime<Utc>,
}

/// Scheduling policy knobs, fixed at scheduler construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Target recall probability used to size intervals.
    pub desired_retention: f64,
    /// Cap on scheduled interval, in days.
    pub maximum_interval: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            desired_retention: 0.9,
            maximum_interval: 365,
        }
    }
}

/// Streak milestone configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Milestone day counts, ascending.
    pub milestones: Vec<u32>,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            milestones: vec![7, 30, 100, 365],
        }
    }
}

/// Relative thresholds for the 0-4 heatmap activity scale, as fractions of
/// the busiest day in the query window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityThresholds {
    pub high: f64,
    pub medium_high: f64,
    pub medium: f64,
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            high: 0.75,
            medium_high: 0.5,
            medium: 0.25,
        }
    }
}

/// Answer evaluator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Answers shorter than this (after trimming) are rated Again without
    /// spending an LLM call.
    pub min_answer_chars: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self { min_answer_chars: 3 }
    }
}

/// Streak summary for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakData {
    /// Consecutive practice days ending today or yesterday.
    pub current_streak: u32,
    /// Longest run of contiguous practice days ever observed.
    pub longest_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak_start: Option<NaiveDate>,
    pub is_active_today: bool,
    pub milestones_reached: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_milestone: Option<u32>,
    /// Distinct practice days in the trailing 7-day window (today inclusive).
    pub days_this_week: u32,
    /// Distinct practice days in the trailing 30-day window (today inclusive).
    pub days_this_month: u32,
}

/// One day of practice activity for heatmap rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub reviews: u32,
    pub exercises: u32,
    pub total: u32,
    pub minutes: u32,
    /// Relative activity level 0-4 against the busiest day in range.
    pub level: u8,
}
