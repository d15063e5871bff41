//! Magic ball questions and answers.

mod answer_book;
mod question_store;

pub use answer_book::AnswerBook;
pub use question_store::QuestionStore;
