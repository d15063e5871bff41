//! Username and password verification against stored hashes.

use std::fmt;
use std::sync::Arc;

use tokio::task::spawn_blocking;

use super::{PasswordHasher, UserStore};
use crate::{Error, Result};
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Checks a username and plaintext password against the user store.
///
/// An unknown username and a wrong password produce the same `false`, and an
/// unknown username still pays for one hash verification.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl CredentialVerifier {
    /// Creates a verifier over the given store and hasher.
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Returns `true` if the username exists and the password matches its hash.
    ///
    /// # Errors
    ///
    /// Returns an error only if the user store or the hashing primitive fails;
    /// bad credentials are `Ok(false)`.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let password = password.to_owned();

        let Some(user) = self.store.find_by_username(username).await? else {
            tracing::debug!(target: TRACING_TARGET, "login attempt for unknown user");
            return self
                .run_hasher(move |hasher| Ok(hasher.verify_dummy_password(&password)))
                .await;
        };

        let password_hash = user.password_hash;
        let verified = self
            .run_hasher(move |hasher| hasher.verify_password(&password, &password_hash))
            .await?;

        if !verified {
            tracing::debug!(
                target: TRACING_TARGET,
                user_id = user.id,
                "login attempt with wrong password"
            );
        }

        Ok(verified)
    }

    /// Runs an Argon2 computation on the blocking thread pool.
    async fn run_hasher<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&PasswordHasher) -> Result<bool> + Send + 'static,
    {
        let hasher = self.hasher.clone();
        spawn_blocking(move || f(&hasher)).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "password verification task failed"
            );
            Error::internal("password verification task failed").with_source(e)
        })?
    }
}

impl fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use magicball_postgres::model::User;

    use super::*;

    struct MemoryUsers(HashMap<String, User>);

    #[async_trait]
    impl UserStore for MemoryUsers {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
            Ok(self.0.get(username).cloned())
        }
    }

    struct FailingUsers;

    #[async_trait]
    impl UserStore for FailingUsers {
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>> {
            Err(crate::Error::external("postgres", "connection refused"))
        }
    }

    fn verifier(users: &[(&str, &str)]) -> anyhow::Result<CredentialVerifier> {
        let hasher = PasswordHasher::new();
        let mut map = HashMap::new();
        for (id, (username, password)) in (1..).zip(users) {
            let user = User {
                id,
                username: (*username).to_owned(),
                password_hash: hasher.hash_password(password)?,
                created_at: jiff::Timestamp::UNIX_EPOCH.into(),
            };
            map.insert((*username).to_owned(), user);
        }

        Ok(CredentialVerifier::new(Arc::new(MemoryUsers(map)), hasher))
    }

    #[tokio::test]
    async fn accepts_correct_password() -> anyhow::Result<()> {
        let verifier = verifier(&[("alice", "wonderland"), ("bob", "builder")])?;
        assert!(verifier.verify("alice", "wonderland").await?);
        assert!(verifier.verify("bob", "builder").await?);
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() -> anyhow::Result<()> {
        let verifier = verifier(&[("alice", "wonderland")])?;

        let wrong_password = verifier.verify("alice", "looking-glass").await?;
        let unknown_user = verifier.verify("mallory", "wonderland").await?;

        assert!(!wrong_password);
        assert!(!unknown_user);
        assert_eq!(wrong_password, unknown_user);
        Ok(())
    }

    #[tokio::test]
    async fn username_match_is_exact() -> anyhow::Result<()> {
        let verifier = verifier(&[("alice", "wonderland")])?;
        assert!(!verifier.verify("Alice", "wonderland").await?);
        assert!(!verifier.verify("alice ", "wonderland").await?);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_rejected() -> anyhow::Result<()> {
        let user = User {
            id: 1,
            username: "alice".to_owned(),
            password_hash: "plaintext".to_owned(),
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
        };
        let store = MemoryUsers(HashMap::from([("alice".to_owned(), user)]));
        let verifier = CredentialVerifier::new(Arc::new(store), PasswordHasher::new());

        assert!(!verifier.verify("alice", "plaintext").await?);
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_does_not_block_the_runtime() -> anyhow::Result<()> {
        let verifier = verifier(&[("alice", "wonderland")])?;
        let (tx, mut rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(());
        });

        // The in-memory lookup is immediately ready, so the spawned task only
        // runs if verification hands the hash computation to another thread.
        assert!(verifier.verify("alice", "wonderland").await?);
        assert!(rx.try_recv().is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_an_error() {
        let verifier = CredentialVerifier::new(Arc::new(FailingUsers), PasswordHasher::new());
        assert!(verifier.verify("alice", "wonderland").await.is_err());
    }
}
