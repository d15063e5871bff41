//! User repository for credential lookups and provisioning.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewUser, User};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Finds a user by exact username match.
    ///
    /// No normalization is applied: `Alice` and `alice` are different users.
    fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Inserts a new user with an already hashed password.
    ///
    /// Fails with a unique constraint violation if the username is taken.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;
}

impl UserRepository for PgConnection {
    async fn find_user_by_username(&mut self, username: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::username.eq(username))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn create_user(&mut self, new_user: NewUser) -> PgResult<User> {
        use schema::users;

        let user = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            user_id = user.id,
            "user created"
        );

        Ok(user)
    }
}
