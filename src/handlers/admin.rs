// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{question::QuestionRequest, settings::QuizSettings},
    state::AppState,
    store::Store,
    utils::html::{clean_all, clean_html},
};

/// Validates and sanitises a question request.
fn prepare(mut payload: QuestionRequest) -> Result<QuestionRequest, AppError> {
    payload.validate()?;

    payload.module = clean_html(&payload.module);
    payload.question = clean_html(&payload.question);
    payload.options = clean_all(&payload.options);
    payload.correct_answers = clean_all(&payload.correct_answers);
    payload.explanation = clean_html(&payload.explanation);
    payload.image = payload.image.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    if payload.module.is_empty() || payload.question.is_empty() || payload.explanation.is_empty() {
        return Err(AppError::BadRequest(
            "Module, question and explanation are required".to_string(),
        ));
    }

    payload.validate_answer_keys().map_err(|e| {
        AppError::BadRequest(format!(
            "Invalid correct answers ({}): multi-answer questions need at least two, \
             single-answer questions exactly one, and all must match an option",
            e.code
        ))
    })?;

    Ok(payload)
}

/// Lists the whole question bank, answers included.
/// Admin only.
pub async fn list_questions(State(store): State<Arc<dyn Store>>) -> Result<impl IntoResponse, AppError> {
    let questions = store.load_questions().await?;
    Ok(Json(questions))
}

/// Adds a question. The new id is one past the current maximum.
/// Admin only.
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = prepare(payload)?;

    let _bank = state.bank_lock.lock().await;
    let mut questions = state.store.load_questions().await?;
    let id = questions.iter().map(|q| q.id).max().unwrap_or(0) + 1;
    let question = payload.into_question(id);
    questions.push(question.clone());

    state.store.save_questions(&questions).await.map_err(|e| {
        tracing::error!("Failed to save question bank: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!("Question {} added to module '{}'", id, question.module);
    Ok((StatusCode::CREATED, Json(question)))
}

/// Replaces a question in place, keeping its id.
/// Admin only.
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = prepare(payload)?;

    let _bank = state.bank_lock.lock().await;
    let mut questions = state.store.load_questions().await?;
    let slot = questions
        .iter_mut()
        .find(|q| q.id == id)
        .ok_or(AppError::NotFound("Question not found".to_string()))?;
    *slot = payload.into_question(id);
    let updated = slot.clone();

    questions.sort_by_key(|q| q.id);
    state.store.save_questions(&questions).await?;

    tracing::info!("Question {} updated", id);
    Ok(Json(updated))
}

/// Deletes a question by ID.
/// Admin only.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let _bank = state.bank_lock.lock().await;
    let mut questions = state.store.load_questions().await?;
    let before = questions.len();
    questions.retain(|q| q.id != id);

    if questions.len() == before {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    state.store.save_questions(&questions).await?;
    tracing::info!("Question {} deleted", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Removes every question from the bank.
/// Admin only.
pub async fn clear_questions(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let _bank = state.bank_lock.lock().await;
    state.store.save_questions(&[]).await?;
    tracing::warn!("Question bank cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Admin only.
pub async fn get_settings(State(store): State<Arc<dyn Store>>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.load_settings().await?))
}

/// Replaces the quiz settings. A time limit of 0 removes the module's limit.
/// Admin only.
pub async fn update_settings(
    State(store): State<Arc<dyn Store>>,
    Json(payload): Json<QuizSettings>,
) -> Result<impl IntoResponse, AppError> {
    let settings = payload.sanitized().map_err(AppError::BadRequest)?;
    store.save_settings(&settings).await?;
    tracing::info!("Quiz settings updated");
    Ok(Json(settings))
}

/// Deletes every recorded score.
/// Admin only.
pub async fn clear_scores(State(store): State<Arc<dyn Store>>) -> Result<impl IntoResponse, AppError> {
    store.clear_scores().await?;
    tracing::warn!("Leaderboard cleared");
    Ok(StatusCode::NO_CONTENT)
}
