//! Persistence of asked questions with per-user counting.

use async_trait::async_trait;
use magicball_postgres::PgClient;
use magicball_postgres::model::{NewQuestion, Question};
use magicball_postgres::query::{QuestionRepository, UserRepository};

use crate::utility::tracing_targets::MAGIC_BALL as TRACING_TARGET;
use crate::{Error, Result};

/// Records questions and how many times each user asked them.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Records that `username` asked `text`.
    ///
    /// Returns the stored question whose `amount` counts every ask of this
    /// exact text by this user, including this one.
    async fn record_question(&self, username: &str, text: &str) -> Result<Question>;
}

#[async_trait]
impl QuestionStore for PgClient {
    async fn record_question(&self, username: &str, text: &str) -> Result<Question> {
        let mut conn = self.get_connection().await?;

        let Some(user) = conn.find_user_by_username(username).await? else {
            tracing::warn!(
                target: TRACING_TARGET,
                "question asked with a token for a user that no longer exists"
            );
            return Err(Error::internal("token subject does not match any user"));
        };

        let new_question = NewQuestion {
            user_id: user.id,
            text: text.to_owned(),
        };

        let question = conn.record_question(new_question).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = user.id,
            question_id = question.id,
            amount = question.amount,
            "question recorded"
        );

        Ok(question)
    }
}
