// src/engine/grader.rs

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::{
    config::{MAX_POINTS_PER_QUESTION, PARTIAL_CREDIT_DECIMALS},
    models::{
        answer::{AnswerPayload, SubmittedAnswer},
        question::Question,
    },
};

/// Per-question result, enough to render a review without re-grading.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackItem {
    pub id: i64,
    pub question: String,
    pub correct_answers: Vec<String>,
    /// The response exactly as submitted; `None` when the question was skipped.
    pub user_answer: Option<AnswerPayload>,
    pub is_correct: bool,
    pub awarded: f64,
    pub max_points: f64,
    /// Effective multi-select flag used for grading.
    pub allow_multiple: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    /// Sum of awarded points. Not rounded.
    pub score: f64,
    pub feedback: Vec<FeedbackItem>,
}

/// Grades an assembled quiz.
///
/// Questions are graded independently in quiz order. Missing or mis-shaped
/// answers score zero; a question without correct answers can never score.
pub fn grade(quiz: &[Question], answers: &HashMap<i64, AnswerPayload>) -> GradeReport {
    let mut score = 0.0;
    let mut feedback = Vec::with_capacity(quiz.len());

    for question in quiz {
        let multi = question.effective_multi();
        let raw = answers.get(&question.id);
        let submitted = SubmittedAnswer::interpret(raw, multi);

        let (is_correct, awarded) = if multi {
            grade_multi(&question.correct_answers, &submitted)
        } else {
            grade_single(&question.correct_answers, &submitted)
        };

        score += awarded;
        feedback.push(FeedbackItem {
            id: question.id,
            question: question.question.clone(),
            correct_answers: question.correct_answers.clone(),
            user_answer: raw.cloned(),
            is_correct,
            awarded,
            max_points: MAX_POINTS_PER_QUESTION,
            allow_multiple: multi,
        });
    }

    GradeReport { score, feedback }
}

fn grade_single(correct: &[String], submitted: &SubmittedAnswer) -> (bool, f64) {
    let is_correct = match correct.first() {
        Some(expected) => submitted.as_text() == expected,
        None => false,
    };
    let awarded = if is_correct { MAX_POINTS_PER_QUESTION } else { 0.0 };
    (is_correct, awarded)
}

fn grade_multi(correct: &[String], submitted: &SubmittedAnswer) -> (bool, f64) {
    let correct: BTreeSet<&str> = correct.iter().map(String::as_str).collect();
    let selected = submitted.as_set();

    let true_pos = selected.intersection(&correct).count();
    let false_pos = selected.difference(&correct).count();

    if !correct.is_empty() && true_pos == correct.len() && false_pos == 0 {
        return (true, MAX_POINTS_PER_QUESTION);
    }

    let net = true_pos as f64 - false_pos as f64;
    let partial = (net / correct.len().max(1) as f64).max(0.0) * MAX_POINTS_PER_QUESTION;
    (false, round_to(partial, PARTIAL_CREDIT_DECIMALS))
}

/// Rounds half away from zero. Returns 0.0 for non-finite input.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, correct: &[&str], allow_multiple: bool) -> Question {
        Question {
            id,
            module: "Basics".into(),
            question: format!("Question {id}"),
            options: vec!["1".into(), "2".into(), "3".into(), "4".into(), "5".into()],
            correct_answers: correct.iter().map(|s| s.to_string()).collect(),
            allow_multiple,
            difficulty: "Easy".into(),
            image: None,
            explanation: String::new(),
            answer: None,
        }
    }

    fn text(s: &str) -> AnswerPayload {
        AnswerPayload::Text(s.to_string())
    }

    fn choices(items: &[&str]) -> AnswerPayload {
        AnswerPayload::Choices(items.iter().map(|s| s.to_string()).collect())
    }

    fn grade_one(q: Question, answer: Option<AnswerPayload>) -> FeedbackItem {
        let mut answers = HashMap::new();
        if let Some(a) = answer {
            answers.insert(q.id, a);
        }
        let report = grade(&[q], &answers);
        assert_eq!(report.feedback.len(), 1);
        assert_eq!(report.score, report.feedback[0].awarded);
        report.feedback.into_iter().next().unwrap()
    }

    #[test]
    fn test_single_answer_exact_match() {
        let item = grade_one(question(1, &["4"], false), Some(text("4")));
        assert!(item.is_correct);
        assert_eq!(item.awarded, 1.0);
        assert!(!item.allow_multiple);
    }

    #[test]
    fn test_single_answer_wrong_or_missing() {
        let item = grade_one(question(1, &["4"], false), Some(text("5")));
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);

        let item = grade_one(question(1, &["4"], false), None);
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);
        assert!(item.user_answer.is_none());
    }

    #[test]
    fn test_single_answer_list_payload_is_empty_text() {
        let item = grade_one(question(1, &["4"], false), Some(choices(&["4"])));
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);
    }

    #[test]
    fn test_single_answer_without_key_never_scores() {
        let item = grade_one(question(1, &[], false), Some(text("")));
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);
    }

    #[test]
    fn test_multi_exact_match_ignores_order_and_duplicates() {
        let item = grade_one(question(1, &["2", "4"], true), Some(choices(&["4", "2", "2"])));
        assert!(item.is_correct);
        assert_eq!(item.awarded, 1.0);
    }

    #[test]
    fn test_multi_partial_credit() {
        let item = grade_one(question(1, &["2", "4"], true), Some(choices(&["2"])));
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.5);
    }

    #[test]
    fn test_multi_false_positive_cancels_true_positive() {
        let item = grade_one(question(1, &["2", "4"], true), Some(choices(&["2", "3"])));
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);
    }

    #[test]
    fn test_multi_floor_at_zero() {
        let item = grade_one(question(1, &["2", "4"], true), Some(choices(&["1", "3"])));
        assert_eq!(item.awarded, 0.0);
    }

    #[test]
    fn test_multi_select_everything_is_penalised() {
        let item = grade_one(
            question(1, &["2", "4"], true),
            Some(choices(&["1", "2", "3", "4", "5"])),
        );
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);
    }

    #[test]
    fn test_multi_partial_credit_is_rounded() {
        let item = grade_one(question(1, &["1", "2", "3"], true), Some(choices(&["1"])));
        assert_eq!(item.awarded, 0.3333);

        let item = grade_one(question(1, &["1", "2", "3"], true), Some(choices(&["1", "2"])));
        assert_eq!(item.awarded, 0.6667);
    }

    #[test]
    fn test_multi_forced_by_answer_count() {
        let item = grade_one(question(1, &["2", "4"], false), Some(choices(&["2", "4"])));
        assert!(item.allow_multiple);
        assert!(item.is_correct);
    }

    #[test]
    fn test_multi_text_payload_is_empty_set() {
        let item = grade_one(question(1, &["2", "4"], true), Some(text("2")));
        assert_eq!(item.awarded, 0.0);
    }

    #[test]
    fn test_empty_correct_set_never_scores() {
        let item = grade_one(question(1, &[], true), Some(choices(&["A"])));
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);
        assert!(item.awarded.is_finite());

        let item = grade_one(question(1, &[], true), Some(choices(&[])));
        assert!(!item.is_correct);
        assert_eq!(item.awarded, 0.0);
    }

    #[test]
    fn test_total_is_sum_in_quiz_order() {
        let quiz = vec![
            question(3, &["4"], false),
            question(1, &["2", "4"], true),
            question(2, &["1"], false),
        ];
        let mut answers = HashMap::new();
        answers.insert(3, text("4"));
        answers.insert(1, choices(&["2"]));
        answers.insert(99, text("ignored"));

        let report = grade(&quiz, &answers);
        assert_eq!(report.score, 1.5);
        let ids: Vec<i64> = report.feedback.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(report.score >= 0.0 && report.score <= quiz.len() as f64);
    }

    #[test]
    fn test_total_is_not_rounded() {
        let quiz = vec![
            question(1, &["1", "2", "3"], true),
            question(2, &["1", "2", "3"], true),
            question(3, &["1", "2", "3"], true),
        ];
        let answers: HashMap<i64, AnswerPayload> =
            (1..=3).map(|id| (id, choices(&["1"]))).collect();

        let report = grade(&quiz, &answers);
        assert_eq!(report.score, 0.3333 + 0.3333 + 0.3333);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.66666, 4), 0.6667);
        assert_eq!(round_to(f64::NAN, 4), 0.0);
        assert_eq!(round_to(f64::INFINITY, 4), 0.0);
    }
}
