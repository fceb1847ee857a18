use axum::{extract::State, routing::get, Json, Router};

use crate::db::QuestionRepository;
use crate::server::{
    app::{AppState, DynQuestionRepository},
    ApiResponse,
};

async fn get_categories(State(repo): State<DynQuestionRepository>) -> ApiResponse<Json<Vec<String>>> {
    Ok(Json(repo.categories().await?))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .with_state(state)
}
