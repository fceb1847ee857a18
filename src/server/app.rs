use std::sync::Arc;

use anyhow::Context;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, http::StatusCode, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{routes, ApiResponse};
use crate::config::ServerSettings;
use crate::db::QuestionRepository;

pub type DynQuestionRepository = Arc<dyn QuestionRepository>;

#[derive(FromRef, Clone)]
pub struct AppState {
    repo: DynQuestionRepository,
}

pub fn app(repo: DynQuestionRepository) -> Router {
    let state = AppState { repo };

    Router::new()
        .route("/metrics", get(metrics))
        .merge(questions_router(state.clone()))
        .merge(category_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            StatusCode::NOT_FOUND
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(repo: DynQuestionRepository, settings: &ServerSettings) -> anyhow::Result<()> {
    let addr = settings.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app(repo)).await?;
    Ok(())
}

async fn metrics() -> ApiResponse<Response> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder.encode(&metrics, &mut buf)?;
    Ok((
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response())
}
