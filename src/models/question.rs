// src/models/question.rs

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::config::MAX_OPTIONS;

/// A question in the bank.
///
/// Read-only from the engine's point of view; the admin handlers and the
/// stores are the only places that create or replace questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Topic grouping used to filter the bank when a quiz is assembled.
    pub module: String,

    /// The text shown to the student.
    pub question: String,

    /// Ordered display options.
    #[serde(default)]
    pub options: Vec<String>,

    /// Every option that must be selected for full credit.
    #[serde(default)]
    pub correct_answers: Vec<String>,

    /// Stored hint only. See [`Question::effective_multi`].
    #[serde(default)]
    pub allow_multiple: bool,

    #[serde(default = "default_difficulty")]
    pub difficulty: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub explanation: String,

    /// Legacy single-answer column. Only read by [`Question::normalize`].
    #[serde(default, skip_serializing)]
    pub answer: Option<String>,
}

fn default_difficulty() -> String {
    "Easy".to_string()
}

impl Question {
    /// Whether the question is graded as multi-select.
    ///
    /// The cardinality of `correct_answers` wins over the stored flag: a
    /// question with two or more correct answers is always multi-select.
    pub fn effective_multi(&self) -> bool {
        self.allow_multiple || self.correct_answers.len() > 1
    }

    /// Cleans up a question as loaded from a store.
    ///
    /// Trims options and answers, drops blanks and duplicates, and falls back
    /// to the legacy `answer` field when `correct_answers` is empty.
    pub fn normalize(mut self) -> Self {
        self.options = dedup_trimmed(self.options);
        self.correct_answers = dedup_trimmed(self.correct_answers);

        if self.correct_answers.is_empty() {
            if let Some(legacy) = self.answer.as_deref().map(str::trim) {
                if !legacy.is_empty() {
                    self.correct_answers.push(legacy.to_string());
                }
            }
        }
        self.answer = None;

        self.image = self
            .image
            .map(|img| img.trim().to_string())
            .filter(|img| !img.is_empty());

        self
    }
}

fn dedup_trimmed(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// DTO for sending a question to a student (no answers, no explanation).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question: String,
    /// Options in the order fixed for this attempt.
    pub options: Vec<String>,
    /// Effective flag, so clients can pick checkboxes or radio buttons.
    pub allow_multiple: bool,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            options: q.options.clone(),
            allow_multiple: q.effective_multi(),
            difficulty: q.difficulty.clone(),
            image: q.image.clone(),
        }
    }
}

/// DTO for creating or replacing a question.
#[derive(Debug, Deserialize, Validate)]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub module: String,
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub allow_multiple: bool,
    #[serde(default = "default_difficulty")]
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: String,
    #[validate(custom(function = validate_image_url))]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub explanation: String,
}

impl QuestionRequest {
    /// Cross-field checks the derive cannot express.
    pub fn validate_answer_keys(&self) -> Result<(), validator::ValidationError> {
        let options: Vec<&str> = self.options.iter().map(|o| o.trim()).collect();
        let answers: Vec<&str> = self
            .correct_answers
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect();

        if answers.is_empty() {
            return Err(validator::ValidationError::new("correct_answers_required"));
        }
        if answers.iter().any(|a| !options.contains(a)) {
            return Err(validator::ValidationError::new("answer_not_in_options"));
        }
        if self.allow_multiple && answers.len() < 2 {
            return Err(validator::ValidationError::new("multi_needs_two_answers"));
        }
        if !self.allow_multiple && answers.len() != 1 {
            return Err(validator::ValidationError::new("single_needs_one_answer"));
        }
        Ok(())
    }

    /// Builds the stored question. Text is expected to be sanitised already.
    pub fn into_question(self, id: i64) -> Question {
        Question {
            id,
            module: self.module,
            question: self.question,
            options: self.options,
            correct_answers: self.correct_answers,
            allow_multiple: self.allow_multiple,
            difficulty: self.difficulty,
            image: self.image,
            explanation: self.explanation,
            answer: None,
        }
        .normalize()
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    let non_blank = options.iter().filter(|o| !o.trim().is_empty()).count();
    if non_blank == 0 {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    if non_blank > MAX_OPTIONS {
        return Err(validator::ValidationError::new("too_many_options"));
    }
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

fn validate_difficulty(difficulty: &str) -> Result<(), validator::ValidationError> {
    match difficulty {
        "Easy" | "Medium" | "Hard" => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_difficulty")),
    }
}

fn validate_image_url(url: &str) -> Result<(), validator::ValidationError> {
    if url.trim().is_empty() {
        return Ok(());
    }
    if url.len() > 500 || Url::parse(url.trim()).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
