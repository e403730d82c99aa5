// src/store/mod.rs

//! Persistence for the question bank, the score log and quiz settings.
//!
//! Two backends implement the same traits: flat files in a data directory
//! and PostgreSQL. Handlers only ever see `Arc<dyn Store>`.

pub mod file;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{question::Question, score::ScoreRecord, settings::QuizSettings};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed data in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Every question in the bank, normalized.
    async fn load_questions(&self) -> Result<Vec<Question>, StoreError>;

    /// Replaces the whole bank.
    async fn save_questions(&self, questions: &[Question]) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Adds one record without touching existing ones.
    async fn append_score(&self, record: &ScoreRecord) -> Result<(), StoreError>;

    async fn load_scores(&self) -> Result<Vec<ScoreRecord>, StoreError>;

    async fn clear_scores(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_settings(&self) -> Result<QuizSettings, StoreError>;

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StoreError>;
}

pub trait Store: QuestionStore + ScoreStore + SettingsStore {}

impl<T: QuestionStore + ScoreStore + SettingsStore> Store for T {}

/// The bank a fresh installation starts with.
pub fn seed_questions() -> Vec<Question> {
    let q = |id: i64, module: &str, question: &str, options: &[&str], answer: &str, explanation: &str| Question {
        id,
        module: module.to_string(),
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answers: vec![answer.to_string()],
        allow_multiple: false,
        difficulty: "Easy".to_string(),
        image: None,
        explanation: explanation.to_string(),
        answer: None,
    };

    vec![
        q(
            1,
            "Basics",
            "What is the accounting equation?",
            &[
                "Assets = Liabilities + Equity",
                "Assets = Revenue - Expenses",
                "Equity = Assets + Liabilities",
                "Liabilities = Assets + Equity",
            ],
            "Assets = Liabilities + Equity",
            "The accounting equation represents the relationship between assets, liabilities, and equity.",
        ),
        q(
            2,
            "Basics",
            "Which of these is an expense?",
            &["Sales", "Wages", "Loan", "Capital"],
            "Wages",
            "Wages are an expense because they represent a cost incurred in running the business.",
        ),
        q(
            3,
            "Financial Statements",
            "Which statement shows financial performance over a period?",
            &["Balance Sheet", "Income Statement", "Cash Flow Statement", "Trial Balance"],
            "Income Statement",
            "The income statement shows revenue, expenses, and profit or loss for a period.",
        ),
    ]
}
