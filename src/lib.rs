//! Learning core for the Second Brain knowledge backend.
//!
//! Provides:
//! - FSRS spaced-repetition scheduler (forgetting-curve memory model)
//! - Review forecast bucketing for dashboards
//! - Streak tracking and daily practice history (heatmap data)
//! - LLM-assisted grading of typed answers
//!
//! The crate performs no I/O: callers load card state, call `review()`,
//! and persist the returned state plus its `ReviewLog`. Everything here is
//! safe to call concurrently; serializing reviews per card is the caller's
//! job.

pub mod error;
pub mod evaluator;
pub mod forecast;
pub mod history;
pub mod scheduler;
pub mod streak;
pub mod types;

pub use error::{LlmError, Result};
pub use evaluator::{AnswerEvaluation, CardAnswerEvaluator, ChatMessage, LlmClient, Role};
pub use forecast::{get_review_forecast, ReviewForecast};
pub use history::{calculate_activity_level, get_practice_history, retention_rate};
pub use scheduler::FsrsScheduler;
pub use streak::get_streak_data;
pub use types::{
    ActivityThresholds, CardState, CardStatus, DailyActivity, EvaluatorConfig, Rating, ReviewLog,
    SchedulerConfig, StreakConfig, StreakData,
};
