//! LLM-assisted grading of typed answers.
//!
//! Turns a (question, expected answer, user answer) triple into a review
//! `Rating` for the scheduler. The actual judgment is delegated to an LLM
//! behind the narrow `LlmClient` capability so the surrounding logic stays
//! testable without a network dependency.
//!
//! Degradation policy: a model that answered unhelpfully (malformed payload,
//! out-of-range rating) must never block the review flow, so those cases fall
//! back to a conservative Hard rating. Infrastructure failures (transport,
//! auth, timeout) propagate to the caller.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{LlmError, Result};
use crate::types::{EvaluatorConfig, Rating};

const SYSTEM_PROMPT: &str = "You are grading a spaced-repetition flashcard answer. \
Compare the user's answer to the expected answer and respond with JSON: \
{\"rating\": 1-4, \"feedback\": string, \"key_points_covered\": [string], \
\"key_points_missed\": [string]}. \
Rating scale: 1 = wrong or blank, 2 = partially right with significant gaps, \
3 = right with minor gaps, 4 = right and complete. \
Grade on meaning, not wording.";

const EMPTY_ANSWER_FEEDBACK: &str =
    "Please write out an answer before checking - even a rough attempt helps you remember.";

const FALLBACK_FEEDBACK: &str =
    "Your answer couldn't be fully evaluated this time. Compare it against the expected \
answer and rate yourself honestly.";

/// Message role for LLM chat requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
}

/// One chat-style message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Capability backing the evaluator: one completion call returning parsed
/// JSON. Which model or provider sits behind it is the caller's concern, as
/// are timeouts and retries.
pub trait LlmClient: Send + Sync {
    fn complete(
        &self,
        messages: &[ChatMessage],
        json_mode: bool,
    ) -> impl std::future::Future<Output = Result<Value>> + Send;
}

/// Outcome of grading one typed answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub rating: Rating,
    /// Derived as rating >= Good; never trusted from the model.
    pub is_correct: bool,
    pub feedback: String,
    pub key_points_covered: Vec<String>,
    pub key_points_missed: Vec<String>,
    /// True when the evaluation degraded to a fallback rating instead of a
    /// real judgment.
    pub used_fallback: bool,
}

impl AnswerEvaluation {
    fn from_rating(rating: Rating, feedback: String, covered: Vec<String>, missed: Vec<String>) -> Self {
        Self {
            rating,
            is_correct: rating.is_successful(),
            feedback,
            key_points_covered: covered,
            key_points_missed: missed,
            used_fallback: false,
        }
    }

    fn fallback(rating: Rating, feedback: &str) -> Self {
        Self {
            rating,
            is_correct: rating.is_successful(),
            feedback: feedback.to_string(),
            key_points_covered: Vec::new(),
            key_points_missed: Vec::new(),
            used_fallback: true,
        }
    }
}

/// Grades free-text answers via an LLM and validates the structured verdict.
#[derive(Debug, Clone)]
pub struct CardAnswerEvaluator<C> {
    client: C,
    config: EvaluatorConfig,
}

impl<C: LlmClient> CardAnswerEvaluator<C> {
    pub fn new(client: C, config: EvaluatorConfig) -> Self {
        Self { client, config }
    }

    /// Evaluate a typed answer against the expected one.
    ///
    /// Trivially short answers short-circuit to Again without spending an LLM
    /// call. A malformed model response degrades to a Hard-rated fallback;
    /// any other LLM failure propagates.
    pub async fn evaluate(
        &self,
        question: &str,
        expected_answer: &str,
        user_answer: &str,
    ) -> Result<AnswerEvaluation> {
        let trimmed = user_answer.trim();
        if trimmed.chars().count() < self.config.min_answer_chars {
            return Ok(AnswerEvaluation::fallback(Rating::Again, EMPTY_ANSWER_FEEDBACK));
        }

        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(
                json!({
                    "question": question,
                    "expected_answer": expected_answer,
                    "user_answer": trimmed,
                })
                .to_string(),
            ),
        ];

        match self.client.complete(&messages, true).await {
            Ok(verdict) => Ok(Self::parse_verdict(&verdict)),
            Err(err) if err.is_degradable() => {
                warn!(error = %err, "answer evaluation degraded to fallback rating");
                Ok(AnswerEvaluation::fallback(Rating::Hard, FALLBACK_FEEDBACK))
            }
            Err(err) => Err(err),
        }
    }

    fn parse_verdict(verdict: &Value) -> AnswerEvaluation {
        // An out-of-range or non-integer rating is coerced to Hard: neither
        // auto-fail nor auto-pass on ambiguous model output.
        let rating = verdict
            .get("rating")
            .and_then(Value::as_u64)
            .and_then(|v| u8::try_from(v).ok())
            .and_then(Rating::from_value)
            .unwrap_or_else(|| {
                warn!("model returned an unusable rating, coercing to Hard");
                Rating::Hard
            });

        let feedback = verdict
            .get("feedback")
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_FEEDBACK)
            .to_string();

        AnswerEvaluation::from_rating(
            rating,
            feedback,
            string_list(verdict, "key_points_covered"),
            string_list(verdict, "key_points_missed"),
        )
    }
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
