// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, prelude::FromRow, types::Json};

use super::{QuestionStore, ScoreStore, SettingsStore, StoreError};
use crate::models::{question::Question, score::ScoreRecord, settings::QuizSettings};

/// PostgreSQL backend. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Represents the 'questions' table in the database.
#[derive(Debug, FromRow)]
struct QuestionRow {
    id: i64,
    module: String,
    question: String,
    /// Stored as a JSON array in the database.
    options: Json<Vec<String>>,
    correct_answers: Json<Vec<String>>,
    allow_multiple: bool,
    difficulty: String,
    image: Option<String>,
    explanation: String,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: row.id,
            module: row.module,
            question: row.question,
            options: row.options.0,
            correct_answers: row.correct_answers.0,
            allow_multiple: row.allow_multiple,
            difficulty: row.difficulty,
            image: row.image,
            explanation: row.explanation,
            answer: None,
        }
        .normalize()
    }
}

/// Represents the 'scores' table in the database.
#[derive(Debug, FromRow)]
struct ScoreRow {
    name: String,
    student_id: Option<String>,
    module: String,
    score: f64,
    total_questions: i32,
    created_at: DateTime<Utc>,
    time_limit_minutes: Option<i32>,
}

impl From<ScoreRow> for ScoreRecord {
    fn from(row: ScoreRow) -> Self {
        ScoreRecord {
            name: row.name,
            student_id: row.student_id,
            module: row.module,
            score: row.score,
            total_questions: u32::try_from(row.total_questions).unwrap_or(0),
            timestamp: row.created_at,
            time_limit_minutes: row.time_limit_minutes.and_then(|m| u32::try_from(m).ok()),
        }
    }
}

#[async_trait]
impl QuestionStore for PgStore {
    async fn load_questions(&self) -> Result<Vec<Question>, StoreError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT
                id, module, question, options, correct_answers,
                allow_multiple, difficulty, image, explanation
            FROM questions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load questions: {:?}", e);
            e
        })?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn save_questions(&self, questions: &[Question]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM questions").execute(&mut *tx).await?;

        for q in questions {
            sqlx::query(
                r#"
                INSERT INTO questions
                (id, module, question, options, correct_answers, allow_multiple, difficulty, image, explanation)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(q.id)
            .bind(&q.module)
            .bind(&q.question)
            .bind(Json(&q.options))
            .bind(Json(&q.correct_answers))
            .bind(q.allow_multiple)
            .bind(&q.difficulty)
            .bind(&q.image)
            .bind(&q.explanation)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for PgStore {
    async fn append_score(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        let total = i32::try_from(record.total_questions).unwrap_or(i32::MAX);
        let limit = record.time_limit_minutes.map(|m| i32::try_from(m).unwrap_or(i32::MAX));

        sqlx::query(
            r#"
            INSERT INTO scores (name, student_id, module, score, total_questions, created_at, time_limit_minutes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&record.name)
        .bind(&record.student_id)
        .bind(&record.module)
        .bind(record.score)
        .bind(total)
        .bind(record.timestamp)
        .bind(limit)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to append score: {:?}", e);
            e
        })?;

        Ok(())
    }

    async fn load_scores(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let rows: Vec<ScoreRow> = sqlx::query_as(
            r#"
            SELECT name, student_id, module, score, total_questions, created_at, time_limit_minutes
            FROM scores
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ScoreRecord::from).collect())
    }

    async fn clear_scores(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM scores").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn load_settings(&self) -> Result<QuizSettings, StoreError> {
        let row: Option<(Json<QuizSettings>,)> =
            sqlx::query_as("SELECT data FROM quiz_settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(data,)| data.0).unwrap_or_default())
    }

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO quiz_settings (id, data)
            VALUES (1, $1)
            ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data
            "#,
        )
        .bind(Json(settings))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
