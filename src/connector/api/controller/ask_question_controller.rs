use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::super::Container;

/// The only failure text a caller ever sees; details stay in the server log.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Debug, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskQuestionResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serves `POST /api/ask-question`.
#[derive(Clone)]
pub struct AskQuestionController {
    container: Arc<Container>,
}

impl AskQuestionController {
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    /// The body is decoded as JSON whatever its `Content-Type`.
    pub async fn ask(&self, body: Bytes) -> Response {
        let request: AskQuestionRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                error!("Rejected ask-question request body: {}", e);
                return Self::internal_error();
            }
        };

        let use_case = self.container.ask_question_use_case();
        match use_case.execute(&request.question).await {
            Ok(answer) => {
                info!("Answered question ({} chars)", answer.chars().count());
                (
                    StatusCode::OK,
                    Json(AskQuestionResponse { response: answer }),
                )
                    .into_response()
            }
            Err(e) => {
                error!("Failed to answer question: {}", e);
                Self::internal_error()
            }
        }
    }

    fn internal_error() -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: GENERIC_ERROR_MESSAGE.to_string(),
            }),
        )
            .into_response()
    }
}

/// axum handler delegating to [`AskQuestionController::ask`].
pub async fn ask_question(
    State(controller): State<AskQuestionController>,
    body: Bytes,
) -> Response {
    controller.ask(body).await
}
