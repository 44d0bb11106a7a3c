use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use crate::connector::adapter::ASK_QUESTION_PATH;

use super::container::Container;
use super::controller::{ask_question, AskQuestionController};

pub const HEALTH_PATH: &str = "/health";

/// HTTP routes of the prompt relay.
pub struct Router {
    ask_question_controller: AskQuestionController,
}

impl Router {
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            ask_question_controller: AskQuestionController::new(container),
        }
    }

    pub fn into_axum(self) -> axum::Router {
        axum::Router::new()
            .route(ASK_QUESTION_PATH, post(ask_question))
            .route(HEALTH_PATH, get(|| async { "ok" }))
            .with_state(self.ask_question_controller)
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(%addr, "Prompt relay listening");

        axum::serve(listener, self.into_axum())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Prompt relay stopped");
        Ok(())
    }
}
