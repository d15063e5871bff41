//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,no_run
//! use magicball_server::handler::routes;
//! use magicball_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&config).await?;
//! let app: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod error;
mod magic_ball;
mod monitors;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and a JSON `404` fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(magic_ball::routes())
        .merge(monitors::routes())
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::Router;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use jiff::Timestamp;
    use magicball_postgres::model::{Question, User};

    use crate::handler::routes;
    use crate::service::{
        PasswordHasher, QuestionStore, ServiceState, TokenConfig, TokenService, UserStore,
    };
    use crate::{Error, Result};

    /// Signing secret shared by test servers and test token services.
    pub const TEST_SECRET: &str = "magicball-test-secret";

    /// Users known to every test server, as `(username, password)`.
    pub const TEST_USERS: [(&str, &str); 2] = [("alice", "wonderland"), ("bob", "builder")];

    /// User store over a fixed in-memory map.
    pub struct MemoryUserStore {
        users: HashMap<String, User>,
    }

    impl MemoryUserStore {
        pub fn with_users(users: &[(&str, &str)]) -> anyhow::Result<Self> {
            let hasher = PasswordHasher::new();
            let mut map = HashMap::new();

            for (id, (username, password)) in (1..).zip(users) {
                let user = User {
                    id,
                    username: (*username).to_owned(),
                    password_hash: hasher.hash_password(password)?,
                    created_at: Timestamp::now().into(),
                };
                map.insert(user.username.clone(), user);
            }

            Ok(Self { users: map })
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
            Ok(self.users.get(username).cloned())
        }
    }

    /// Question store counting asks per `(username, text)`.
    #[derive(Default)]
    pub struct MemoryQuestionStore {
        questions: Mutex<HashMap<(String, String), Question>>,
    }

    #[async_trait]
    impl QuestionStore for MemoryQuestionStore {
        async fn record_question(&self, username: &str, text: &str) -> Result<Question> {
            let mut questions = self
                .questions
                .lock()
                .map_err(|_| Error::internal("question store lock poisoned"))?;

            let next_id = i32::try_from(questions.len()).unwrap_or(i32::MAX) + 1;
            let now = Timestamp::now();
            let question = questions
                .entry((username.to_owned(), text.to_owned()))
                .and_modify(|question| {
                    question.amount += 1;
                    question.updated_at = now.into();
                })
                .or_insert_with(|| Question {
                    id: next_id,
                    user_id: 1,
                    text: text.to_owned(),
                    amount: 1,
                    created_at: now.into(),
                    updated_at: now.into(),
                });

            Ok(question.clone())
        }
    }

    /// Returns a token service using [`TEST_SECRET`].
    pub fn test_token_service() -> TokenService {
        TokenService::new(&TokenConfig::new(TEST_SECRET)).expect("valid token config")
    }

    /// Returns a state backed by in-memory stores holding [`TEST_USERS`].
    pub fn test_state() -> anyhow::Result<ServiceState> {
        Ok(ServiceState::new(
            test_token_service(),
            Arc::new(MemoryUserStore::with_users(&TEST_USERS)?),
            Arc::new(MemoryQuestionStore::default()),
        ))
    }

    /// Returns a new [`TestServer`] with the given router and a test state.
    pub fn create_test_server_with_router(
        router: Router<ServiceState>,
    ) -> anyhow::Result<TestServer> {
        let server = TestServer::new(router.with_state(test_state()?))?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with all routes.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_router(routes())
    }

    /// Logs in through `/login` and returns the access token.
    pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
        let response = server
            .post("/login")
            .form(&[("username", username), ("password", password)])
            .await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        body["access_token"]
            .as_str()
            .expect("access token in login response")
            .to_owned()
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/does-not-exist").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "not_found");

        Ok(())
    }
}
