//! Lookup of stored user records by username.

use async_trait::async_trait;
use magicball_postgres::PgClient;
use magicball_postgres::model::User;
use magicball_postgres::query::UserRepository;

use crate::Result;

/// Read access to stored user records.
///
/// Implemented for [`PgClient`]; tests inject in-memory stores.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by exact username match.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
impl UserStore for PgClient {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.get_connection().await?;
        let user = conn.find_user_by_username(username).await?;
        Ok(user)
    }
}
