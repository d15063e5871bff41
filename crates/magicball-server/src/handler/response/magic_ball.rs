//! Magic ball response types.

use magicball_postgres::model::Question;
use serde::{Deserialize, Serialize};

/// A recorded question and how many times the caller asked it.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    /// Question text as stored.
    pub text: String,
    /// Number of times the caller asked this exact text.
    pub amount: i32,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            text: question.text,
            amount: question.amount,
        }
    }
}

/// One of the magic ball's canned answers.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}
