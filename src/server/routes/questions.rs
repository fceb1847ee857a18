use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    db::{CrudRepository, NewQuestion, Question, QuestionRepository},
    server::{
        app::{AppState, DynQuestionRepository},
        ApiResponse,
    },
    telemetry::CATEGORY_LOOKUPS,
};

async fn get_questions(State(repo): State<DynQuestionRepository>) -> ApiResponse<Json<Vec<Question>>> {
    Ok(Json(repo.find_all().await?))
}

async fn questions_by_category(
    State(repo): State<DynQuestionRepository>,
    Path(category): Path<String>,
) -> ApiResponse<Json<Vec<Question>>> {
    let found = repo.find_by_category(&category).await?;
    let label = if found.is_empty() { "false" } else { "true" };
    CATEGORY_LOOKUPS.with_label_values(&[label]).inc();
    Ok(Json(found))
}

async fn question(
    State(repo): State<DynQuestionRepository>,
    Path(id): Path<i64>,
) -> ApiResponse<Json<Question>> {
    let q = repo.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)?;
    Ok(Json(q))
}

async fn create_question(
    State(repo): State<DynQuestionRepository>,
    Json(new_question): Json<NewQuestion>,
) -> ApiResponse<(StatusCode, Json<Question>)> {
    let q = repo.create(new_question).await?;
    Ok((StatusCode::CREATED, Json(q)))
}

async fn update_question(
    State(repo): State<DynQuestionRepository>,
    Path(id): Path<i64>,
    Json(update): Json<NewQuestion>,
) -> ApiResponse<Json<Question>> {
    let q = Question::from_new(id, update);
    if !repo.update(q.clone()).await? {
        return Err(sqlx::Error::RowNotFound.into());
    }
    Ok(Json(q))
}

async fn delete_question(
    State(repo): State<DynQuestionRepository>,
    Path(id): Path<i64>,
) -> ApiResponse<StatusCode> {
    if !repo.delete(id).await? {
        return Err(sqlx::Error::RowNotFound.into());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn count(State(repo): State<DynQuestionRepository>) -> ApiResponse<Json<Value>> {
    Ok(Json(json!({ "count": repo.count().await? })))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/count", get(count))
        .route("/questions/category/{category}", get(questions_by_category))
        .route(
            "/questions/{id}",
            get(question).put(update_question).delete(delete_question),
        )
        .with_state(state)
}
