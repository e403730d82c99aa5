// src/handlers/quiz.rs

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{ATTEMPT_TTL_HOURS, TIME_LIMIT_CHOICES},
    engine::{assemble, grade, grader::round_to},
    error::AppError,
    models::{
        attempt::{
            AttemptRegistry, FeedbackView, ModuleSummary, QuizAttempt, SaveAnswersRequest,
            StartQuizRequest, StartQuizResponse, SubmitQuizRequest, SubmitQuizResponse,
        },
        question::{PublicQuestion, Question},
        score::ScoreRecord,
        settings::QuizSettings,
    },
    state::AppState,
    store::Store,
};

/// Lists modules with their question counts and admin settings.
pub async fn list_modules(State(store): State<Arc<dyn Store>>) -> Result<impl IntoResponse, AppError> {
    let questions = store.load_questions().await?;
    let settings = store.load_settings().await?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for q in &questions {
        *counts.entry(q.module.clone()).or_default() += 1;
    }

    let modules: Vec<ModuleSummary> = counts
        .into_iter()
        .map(|(module, question_count)| ModuleSummary {
            enabled: settings.is_enabled(&module),
            time_limit_minutes: settings.time_limit(&module),
            module,
            question_count,
        })
        .collect();

    Ok(Json(modules))
}

/// Starts a quiz attempt.
///
/// * Rejects disabled modules and modules without questions.
/// * Draws the questions and fixes their option order for the attempt.
/// * An admin time limit for the module overrides the student's choice.
pub async fn start_quiz(
    State(state): State<AppState>,
    Json(mut req): Json<StartQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.name = req.name.trim().to_string();
    req.student_id = req
        .student_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    req.validate()?;

    let settings = state.store.load_settings().await?;
    if !settings.is_enabled(&req.module) {
        return Err(AppError::Forbidden(format!(
            "Module '{}' is currently disabled by the admin",
            req.module
        )));
    }

    let bank = state.store.load_questions().await?;
    let available = bank.iter().filter(|q| q.module == req.module).count();
    if available == 0 {
        return Err(AppError::NotFound(format!(
            "Module '{}' has no questions yet",
            req.module
        )));
    }

    let time_limit_minutes = match settings.time_limit(&req.module) {
        Some(minutes) => Some(minutes),
        None => match req.time_limit_minutes {
            None | Some(0) => None,
            Some(m) if TIME_LIMIT_CHOICES.contains(&m) => Some(m),
            Some(m) => {
                return Err(AppError::BadRequest(format!(
                    "Time limit must be one of {:?} minutes, got {}",
                    TIME_LIMIT_CHOICES, m
                )));
            }
        },
    };

    let count = req.count.unwrap_or(available).max(1);
    let questions = {
        let mut rng = rand::thread_rng();
        assemble(&bank, &req.module, count, &mut rng)
    };

    let now = Utc::now();
    let pruned = state
        .attempts
        .prune_started_before(now - Duration::hours(ATTEMPT_TTL_HOURS))
        .await;
    if pruned > 0 {
        tracing::info!("Discarded {} stale quiz attempts", pruned);
    }

    let attempt = QuizAttempt {
        id: Uuid::new_v4(),
        name: req.name,
        student_id: req.student_id,
        module: req.module,
        questions,
        answers: Default::default(),
        time_limit_minutes,
        started_at: now,
    };

    let response = StartQuizResponse {
        attempt_id: attempt.id,
        module: attempt.module.clone(),
        questions: attempt.questions.iter().map(PublicQuestion::from).collect(),
        time_limit_minutes,
        started_at: now,
    };

    tracing::info!(
        "Quiz attempt {} started: module '{}', {} questions",
        attempt.id,
        attempt.module,
        attempt.questions.len()
    );
    state.attempts.insert(attempt).await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Saves answers for an attempt in progress.
pub async fn save_answers(
    State(attempts): State<AttemptRegistry>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveAnswersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let answered = attempts
        .update(&id, |attempt| {
            attempt.record_answers(req.answers);
            attempt.answers.len()
        })
        .await
        .ok_or_else(|| AppError::NotFound("Quiz attempt not found".to_string()))?;

    Ok(Json(serde_json::json!({ "answered": answered })))
}

/// Submits an attempt, grades it and records the score.
///
/// The attempt is taken out of the registry while it is being graded, so a
/// second submit cannot record it twice. It is put back if the store fails,
/// letting the student retry. If any of its questions were removed from the
/// bank meanwhile, it is discarded with a 409 so the student can start over.
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut attempt = state
        .attempts
        .remove(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Quiz attempt not found".to_string()))?;
    attempt.record_answers(req.answers);

    let (bank, settings) = match load_bank_and_settings(state.store.as_ref()).await {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Quiz attempt {} kept for retry, store unavailable: {:?}", id, e);
            state.attempts.insert(attempt).await;
            return Err(e);
        }
    };

    let missing: Vec<String> = attempt
        .questions
        .iter()
        .filter(|q| !bank.iter().any(|b| b.id == q.id))
        .map(|q| q.id.to_string())
        .collect();
    if !missing.is_empty() {
        tracing::warn!("Quiz attempt {} discarded, questions removed: {:?}", id, missing);
        return Err(AppError::Conflict(format!(
            "One or more quiz questions were removed by an admin while you were answering (IDs: {}). Please start a new quiz.",
            missing.join(", ")
        )));
    }

    let report = grade(&attempt.questions, &attempt.answers);
    let total_questions = attempt.questions.len() as u32;
    let overtime = attempt.is_overtime(Utc::now());

    let record = ScoreRecord::new(
        attempt.name.clone(),
        attempt.student_id.clone(),
        attempt.module.clone(),
        report.score,
        total_questions,
        attempt.time_limit_minutes,
    );
    if let Err(e) = state.store.append_score(&record).await {
        tracing::error!("Quiz attempt {} kept for retry, score not saved: {:?}", id, e);
        state.attempts.insert(attempt).await;
        return Err(e.into());
    }

    let feedback = report
        .feedback
        .into_iter()
        .zip(&attempt.questions)
        .map(|(item, question)| {
            let show = !question.explanation.is_empty()
                && (!item.is_correct || settings.show_explanations_for_correct);
            FeedbackView {
                explanation: show.then(|| question.explanation.clone()),
                item,
            }
        })
        .collect();

    let percentage = if total_questions > 0 {
        round_to(record.score / total_questions as f64 * 100.0, 1)
    } else {
        0.0
    };

    tracing::info!(
        "Quiz attempt {} submitted: {}/{} in '{}'",
        id,
        record.score,
        total_questions,
        attempt.module
    );

    Ok(Json(SubmitQuizResponse {
        name: attempt.name,
        module: attempt.module,
        score: record.score,
        total_questions,
        percentage,
        overtime,
        feedback,
    }))
}

async fn load_bank_and_settings(store: &dyn Store) -> Result<(Vec<Question>, QuizSettings), AppError> {
    let bank = store.load_questions().await?;
    let settings = store.load_settings().await?;
    Ok((bank, settings))
}
