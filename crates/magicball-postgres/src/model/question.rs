//! Question model with a running per-user ask counter.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::questions;

/// A question asked by a user.
///
/// The pair `(user_id, text)` is unique; asking the same text again
/// increments `amount` instead of inserting a new row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Question {
    /// Unique question identifier.
    pub id: i32,
    /// The user who asked the question.
    pub user_id: i32,
    /// Exact question text (up to 255 characters).
    pub text: String,
    /// How many times this user asked this exact text.
    pub amount: i32,
    /// Timestamp of the first ask.
    pub created_at: Timestamp,
    /// Timestamp of the latest ask.
    pub updated_at: Timestamp,
}

/// Data for recording a question.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewQuestion {
    /// The user asking the question.
    pub user_id: i32,
    /// Exact question text.
    pub text: String,
}
