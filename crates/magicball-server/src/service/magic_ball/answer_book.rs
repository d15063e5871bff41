//! The fixed set of magic ball answers.

use rand::seq::IndexedRandom;

/// Canned answers, one of which is picked uniformly at random.
const ANSWERS: [&str; 8] = [
    "Да",
    "Нет",
    "Возможно",
    "Вопрос не ясен",
    "Абсолютно точно",
    "Никогда",
    "Даже не думай",
    "Сконцентрируйся и спроси опять",
];

/// Source of magic ball answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerBook;

impl AnswerBook {
    /// Creates a new answer book.
    pub fn new() -> Self {
        Self
    }

    /// Returns every answer the book can give.
    #[inline]
    pub fn answers(&self) -> &'static [&'static str] {
        &ANSWERS
    }

    /// Picks an answer uniformly at random.
    pub fn pick(&self) -> &'static str {
        ANSWERS.choose(&mut rand::rng()).copied().unwrap_or(ANSWERS[0])
    }
}
