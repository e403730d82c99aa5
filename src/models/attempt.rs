// src/models/attempt.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::{
    engine::grader::FeedbackItem,
    models::{
        answer::AnswerPayload,
        question::{PublicQuestion, Question},
    },
};

/// A quiz in progress.
///
/// `questions` is the assembled quiz: its order is the numbering and grading
/// order, and each question's options are already in the order shown to the
/// student. Neither changes for the life of the attempt.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub name: String,
    pub student_id: Option<String>,
    pub module: String,
    pub questions: Vec<Question>,
    pub answers: HashMap<i64, AnswerPayload>,
    pub time_limit_minutes: Option<u32>,
    pub started_at: DateTime<Utc>,
}

impl QuizAttempt {
    /// Merges answers, ignoring ids that are not part of this quiz.
    pub fn record_answers(&mut self, answers: HashMap<i64, AnswerPayload>) {
        for (id, answer) in answers {
            if self.questions.iter().any(|q| q.id == id) {
                self.answers.insert(id, answer);
            }
        }
    }

    pub fn is_overtime(&self, now: DateTime<Utc>) -> bool {
        match self.time_limit_minutes {
            Some(minutes) => now - self.started_at > Duration::minutes(i64::from(minutes)),
            None => false,
        }
    }
}

/// Attempts in progress, keyed by attempt id.
#[derive(Clone, Default)]
pub struct AttemptRegistry {
    inner: Arc<RwLock<HashMap<Uuid, QuizAttempt>>>,
}

impl AttemptRegistry {
    pub async fn insert(&self, attempt: QuizAttempt) {
        self.inner.write().await.insert(attempt.id, attempt);
    }

    pub async fn remove(&self, id: &Uuid) -> Option<QuizAttempt> {
        self.inner.write().await.remove(id)
    }

    /// Applies `f` to the attempt, if it exists.
    pub async fn update<T>(&self, id: &Uuid, f: impl FnOnce(&mut QuizAttempt) -> T) -> Option<T> {
        self.inner.write().await.get_mut(id).map(f)
    }

    /// Drops attempts started before `cutoff`. Returns how many were dropped.
    pub async fn prune_started_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut attempts = self.inner.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| a.started_at >= cutoff);
        before - attempts.len()
    }
}

/// DTO for starting a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct StartQuizRequest {
    #[validate(length(min = 1, max = 100, message = "Please enter your name before starting."))]
    pub name: String,
    #[validate(length(max = 50))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub module: String,
    /// Defaults to every question in the module.
    pub count: Option<usize>,
    /// Ignored when the admin has set a limit for the module. 0 = no limit.
    pub time_limit_minutes: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartQuizResponse {
    pub attempt_id: Uuid,
    pub module: String,
    pub questions: Vec<PublicQuestion>,
    pub time_limit_minutes: Option<u32>,
    pub started_at: DateTime<Utc>,
}

/// DTO for saving answers while the quiz is in progress.
#[derive(Debug, Deserialize)]
pub struct SaveAnswersRequest {
    pub answers: HashMap<i64, AnswerPayload>,
}

/// DTO for submitting a quiz. Answers here are merged over saved ones.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: HashMap<i64, AnswerPayload>,
}

/// A graded question plus the explanation, when it should be shown.
#[derive(Debug, Serialize)]
pub struct FeedbackView {
    #[serde(flatten)]
    pub item: FeedbackItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub name: String,
    pub module: String,
    pub score: f64,
    pub total_questions: u32,
    pub percentage: f64,
    pub overtime: bool,
    pub feedback: Vec<FeedbackView>,
}

/// Module listing for the quiz start screen.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub module: String,
    pub question_count: usize,
    pub enabled: bool,
    pub time_limit_minutes: Option<u32>,
}
