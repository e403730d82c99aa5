// src/models/answer.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An answer as it arrives over the wire: a single option text, or a list of
/// option texts for multi-select questions.
///
/// Anything else (`null`, numbers, objects, mixed lists) lands in `Other` and
/// is graded as an empty response rather than rejecting the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerPayload {
    Text(String),
    Choices(Vec<String>),
    Other(serde_json::Value),
}

/// A response interpreted against the question it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedAnswer {
    Single(String),
    Multi(BTreeSet<String>),
    NoAnswer,
}

impl SubmittedAnswer {
    /// Reads a raw payload in the mode decided by the question.
    ///
    /// A payload of the wrong shape counts as an empty response for that
    /// mode: an empty string for single-answer questions, an empty set for
    /// multi-select ones.
    pub fn interpret(raw: Option<&AnswerPayload>, multi: bool) -> Self {
        match (raw, multi) {
            (None, _) => SubmittedAnswer::NoAnswer,
            (Some(AnswerPayload::Text(text)), false) => SubmittedAnswer::Single(text.clone()),
            (Some(AnswerPayload::Choices(_)), false) => SubmittedAnswer::Single(String::new()),
            (Some(AnswerPayload::Choices(choices)), true) => {
                SubmittedAnswer::Multi(choices.iter().cloned().collect())
            }
            (Some(AnswerPayload::Text(_)), true) => SubmittedAnswer::Multi(BTreeSet::new()),
            (Some(AnswerPayload::Other(_)), false) => SubmittedAnswer::Single(String::new()),
            (Some(AnswerPayload::Other(_)), true) => SubmittedAnswer::Multi(BTreeSet::new()),
        }
    }

    /// The single-answer view: missing or mis-shaped responses become "".
    pub fn as_text(&self) -> &str {
        match self {
            SubmittedAnswer::Single(text) => text,
            _ => "",
        }
    }

    /// The multi-select view: missing or mis-shaped responses become {}.
    pub fn as_set(&self) -> BTreeSet<&str> {
        match self {
            SubmittedAnswer::Multi(set) => set.iter().map(String::as_str).collect(),
            _ => BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_deserializes_both_shapes() {
        let text: AnswerPayload = serde_json::from_str(r#""4""#).unwrap();
        assert_eq!(text, AnswerPayload::Text("4".into()));

        let list: AnswerPayload = serde_json::from_str(r#"["2","4"]"#).unwrap();
        assert_eq!(list, AnswerPayload::Choices(vec!["2".into(), "4".into()]));
    }

    #[test]
    fn test_unexpected_shapes_are_kept_as_other() {
        for raw in ["null", "4", r#"["x", 3]"#, r#"{"a": 1}"#] {
            let payload: AnswerPayload = serde_json::from_str(raw).unwrap();
            assert!(matches!(payload, AnswerPayload::Other(_)), "{raw}");
            assert_eq!(SubmittedAnswer::interpret(Some(&payload), false).as_text(), "");
            assert!(SubmittedAnswer::interpret(Some(&payload), true).as_set().is_empty());
        }
    }

    #[test]
    fn test_interpret_wrong_shape_is_empty() {
        let list = AnswerPayload::Choices(vec!["4".into()]);
        assert_eq!(SubmittedAnswer::interpret(Some(&list), false).as_text(), "");

        let text = AnswerPayload::Text("4".into());
        assert!(SubmittedAnswer::interpret(Some(&text), true).as_set().is_empty());
    }

    #[test]
    fn test_interpret_collapses_duplicates() {
        let list = AnswerPayload::Choices(vec!["2".into(), "2".into(), "4".into()]);
        let answer = SubmittedAnswer::interpret(Some(&list), true);
        assert_eq!(answer.as_set().len(), 2);
    }

    #[test]
    fn test_missing_answer() {
        let answer = SubmittedAnswer::interpret(None, false);
        assert_eq!(answer, SubmittedAnswer::NoAnswer);
        assert_eq!(answer.as_text(), "");
        assert!(answer.as_set().is_empty());
    }
}
