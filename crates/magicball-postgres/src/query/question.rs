//! Question repository with per-user ask counting.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;

use crate::model::{NewQuestion, Question};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for question database operations.
pub trait QuestionRepository {
    /// Records that a user asked a question.
    ///
    /// Inserts the question with `amount = 1`, or increments `amount` when the
    /// same user already asked the exact same text. The upsert is a single
    /// statement, so concurrent asks never lose an increment.
    fn record_question(
        &mut self,
        new_question: NewQuestion,
    ) -> impl Future<Output = PgResult<Question>> + Send;
}

impl QuestionRepository for PgConnection {
    async fn record_question(&mut self, new_question: NewQuestion) -> PgResult<Question> {
        use schema::questions::{self, dsl};

        let now = jiff_diesel::Timestamp::from(Timestamp::now());

        diesel::insert_into(questions::table)
            .values(&new_question)
            .on_conflict((dsl::user_id, dsl::text))
            .do_update()
            .set((dsl::amount.eq(dsl::amount + 1), dsl::updated_at.eq(now)))
            .returning(Question::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }
}
