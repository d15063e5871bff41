//! Magic ball handlers: welcome, questions and answers.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};

use crate::extract::{AuthState, Json, ValidateJson};
use crate::handler::Result;
use crate::handler::request::AskQuestionRequest;
use crate::handler::response::{AnswerResponse, MessageResponse, QuestionResponse};
use crate::service::{AnswerBook, ServiceState, SharedQuestionStore};
use crate::utility::tracing_targets::MAGIC_BALL as TRACING_TARGET;

/// Greets the caller.
async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the magic ball"))
}

/// Records a question asked by the authenticated user.
#[tracing::instrument(skip_all, fields(username = %auth_state.username()))]
async fn ask_question(
    State(question_store): State<SharedQuestionStore>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<AskQuestionRequest>,
) -> Result<Json<QuestionResponse>> {
    let question = question_store
        .record_question(auth_state.username(), &request.text)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        amount = question.amount,
        "question asked"
    );

    Ok(Json(question.into()))
}

/// Returns a random magic ball answer.
#[tracing::instrument(skip_all)]
async fn get_answer(State(answer_book): State<AnswerBook>) -> Json<AnswerResponse> {
    let answer = answer_book.pick();
    tracing::debug!(target: TRACING_TARGET, answer, "answer picked");

    Json(AnswerResponse {
        answer: answer.to_owned(),
    })
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/", get(welcome))
        .route("/ask_question", post(ask_question))
        .route("/get_answer", get(get_answer))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::handler::test::{create_test_server, login};

    #[tokio::test]
    async fn welcome_message() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/").await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<MessageResponse>().message,
            "Welcome to the magic ball"
        );

        Ok(())
    }

    #[tokio::test]
    async fn asking_counts_repeats_per_user() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let alice = login(&server, "alice", "wonderland").await;
        let bob = login(&server, "bob", "builder").await;

        let ask = |token: &str, text: &str| {
            server
                .post("/ask_question")
                .authorization_bearer(token)
                .json(&json!({ "text": text }))
        };

        let first = ask(&alice, "Will it rain?").await.json::<QuestionResponse>();
        let second = ask(&alice, "Will it rain?").await.json::<QuestionResponse>();
        let other_text = ask(&alice, "will it rain?").await.json::<QuestionResponse>();
        let other_user = ask(&bob, "Will it rain?").await.json::<QuestionResponse>();

        assert_eq!(first.text, "Will it rain?");
        assert_eq!(first.amount, 1);
        assert_eq!(second.amount, 2);
        assert_eq!(other_text.amount, 1);
        assert_eq!(other_user.amount, 1);

        Ok(())
    }

    #[tokio::test]
    async fn asking_requires_token() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/ask_question")
            .json(&json!({ "text": "Will it rain?" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[tokio::test]
    async fn question_length_is_validated() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let token = login(&server, "alice", "wonderland").await;

        for text in [String::new(), "?".repeat(256)] {
            let response = server
                .post("/ask_question")
                .authorization_bearer(&token)
                .json(&json!({ "text": text }))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }

        let response = server
            .post("/ask_question")
            .authorization_bearer(&token)
            .json(&json!({ "text": "?".repeat(255) }))
            .await;
        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn answer_is_one_of_the_book() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let book = AnswerBook::new();

        for _ in 0..20 {
            let response = server.get("/get_answer").await;
            response.assert_status_ok();

            let body = response.json::<AnswerResponse>();
            assert!(book.answers().contains(&body.answer.as_str()));
        }

        Ok(())
    }
}
