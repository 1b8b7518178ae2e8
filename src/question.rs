use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Answer, Error};

/// How a question is presented. Yes/no questions are scored like any other
/// single-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    YesNo,
    Single,
    Multiple,
}

impl QuestionKind {
    pub fn arity(self) -> Arity {
        match self {
            QuestionKind::YesNo | QuestionKind::Single => Arity::Single,
            QuestionKind::Multiple => Arity::Multiple,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    #[serde(rename = "single-choice")]
    Single,
    #[serde(rename = "multi-choice")]
    Multiple,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Single => f.write_str("single-choice"),
            Arity::Multiple => f.write_str("multi-choice"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<QuestionOption>,
    /// "None of the above" option of a multi-choice question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub none: Option<String>,
}

impl Question {
    pub fn arity(&self) -> Arity {
        self.kind.arity()
    }

    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Turns typed option numbers (1-based) into an answer.
    ///
    /// Single-choice questions take exactly one number. Multi-choice questions
    /// take one or more numbers separated by commas or spaces; a number typed
    /// twice counts once, like a ticked checkbox.
    pub fn parse_selection(&self, input: &str) -> Option<Answer> {
        let pick = |token: &str| -> Option<String> {
            let number = token.parse::<usize>().ok()?;
            let option = self.options.get(number.checked_sub(1)?)?;
            Some(option.value.clone())
        };

        match self.arity() {
            Arity::Single => pick(input.trim()).map(Answer::Single),
            Arity::Multiple => {
                let mut values: Vec<String> = Vec::new();
                for token in input
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                {
                    let value = pick(token)?;
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                if values.is_empty() {
                    None
                } else {
                    Some(Answer::Multiple(values))
                }
            }
        }
    }
}

/// The questionnaire master. Every option carries its weight, so the
/// questions and the score table can't drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    version: u32,
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let set: QuestionSet = serde_json::from_reader(reader)?;
        set.check()?;
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Looks a question up by its id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn check(&self) -> Result<(), Error> {
        let mut ids = HashSet::new();
        for question in &self.questions {
            if !ids.insert(question.id.as_str()) {
                return Err(Error::QuestionSet(format!(
                    "duplicate question {}",
                    question.id
                )));
            }
            if question.options.is_empty() {
                return Err(Error::QuestionSet(format!(
                    "{} has no options",
                    question.id
                )));
            }
            let mut values = HashSet::new();
            for option in &question.options {
                if !values.insert(option.value.as_str()) {
                    return Err(Error::QuestionSet(format!(
                        "{} lists option {:?} twice",
                        question.id, option.value
                    )));
                }
            }
            match (question.arity(), &question.none) {
                (Arity::Multiple, Some(none)) if values.contains(none.as_str()) => {}
                (Arity::Multiple, Some(none)) => {
                    return Err(Error::QuestionSet(format!(
                        "{} names {:?} as its none option but does not offer it",
                        question.id, none
                    )))
                }
                (Arity::Multiple, None) => {
                    return Err(Error::QuestionSet(format!(
                        "{} is multi-choice without a none option",
                        question.id
                    )))
                }
                (Arity::Single, Some(_)) => {
                    return Err(Error::QuestionSet(format!(
                        "{} is single-choice and can't have a none option",
                        question.id
                    )))
                }
                (Arity::Single, None) => {}
            }
        }
        Ok(())
    }
}

impl FromStr for QuestionSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let set: QuestionSet = serde_json::from_str(s)?;
        set.check()?;
        Ok(set)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::QUESTIONS;

    fn parse(json: &str) -> Result<QuestionSet, Error> {
        json.parse()
    }

    #[test]
    fn test_kind_arity() {
        assert_eq!(QuestionKind::YesNo.arity(), Arity::Single);
        assert_eq!(QuestionKind::Single.arity(), Arity::Single);
        assert_eq!(QuestionKind::Multiple.arity(), Arity::Multiple);
    }

    #[test]
    fn test_embedded_question_kinds() {
        let multiple = QUESTIONS
            .questions()
            .iter()
            .filter(|question| question.arity() == Arity::Multiple)
            .map(|question| question.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(multiple, vec!["p9", "p11", "p12", "p15", "p16", "p19"]);
        assert_eq!(
            QUESTIONS.question("p19").and_then(|q| q.none.as_deref()),
            Some("nenhum")
        );
        assert_eq!(
            QUESTIONS.question("p16").and_then(|q| q.none.as_deref()),
            Some("nenhuma")
        );
    }

    #[test]
    fn test_parse_single_selection() {
        let question = QUESTIONS.question("p3").unwrap();
        assert_eq!(
            question.parse_selection(" 5 "),
            Some(Answer::Single("intenso".to_string()))
        );
        assert_eq!(question.parse_selection("0"), None);
        assert_eq!(question.parse_selection("6"), None);
        assert_eq!(question.parse_selection("1,2"), None);
        assert_eq!(question.parse_selection("alto"), None);
    }

    #[test]
    fn test_parse_multiple_selection() {
        let question = QUESTIONS.question("p9").unwrap();
        assert_eq!(
            question.parse_selection("1, 2"),
            Some(Answer::Multiple(vec![
                "acne".to_string(),
                "rosacea".to_string()
            ]))
        );
        assert_eq!(
            question.parse_selection("3 3"),
            Some(Answer::Multiple(vec!["eczema".to_string()]))
        );
        assert_eq!(question.parse_selection(""), None);
        assert_eq!(question.parse_selection("1,9"), None);
    }

    #[test]
    fn test_loaded_set_goes_through_check() {
        let json = r#"{"version": 3, "questions": [
            {"id": "p9", "prompt": "a", "kind": "multiple", "none": "nenhuma",
             "options": [{"value": "acne", "label": "Acne", "score": 2},
                         {"value": "nenhuma", "label": "Nenhuma", "score": 0}]}
        ]}"#;
        let set = QuestionSet::from_reader(json.as_bytes()).unwrap();
        assert_eq!(set.version(), 3);
        assert_eq!(set.len(), 1);
        assert_eq!(set.questions()[0].none.as_deref(), Some("nenhuma"));

        let without_none = json.replace(r#""none": "nenhuma","#, "");
        assert!(matches!(
            QuestionSet::from_reader(without_none.as_bytes()),
            Err(Error::QuestionSet(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_question() {
        let error = parse(
            r#"{"version": 1, "questions": [
                {"id": "p1", "prompt": "a", "kind": "yes_no",
                 "options": [{"value": "sim", "label": "Sim", "score": 2}]},
                {"id": "p1", "prompt": "b", "kind": "yes_no",
                 "options": [{"value": "sim", "label": "Sim", "score": 2}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(error, Error::QuestionSet(message) if message.contains("duplicate")));
    }

    #[test]
    fn test_rejects_multiple_without_none() {
        let error = parse(
            r#"{"version": 1, "questions": [
                {"id": "p9", "prompt": "a", "kind": "multiple",
                 "options": [{"value": "acne", "label": "Acne", "score": 2}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(error, Error::QuestionSet(message) if message.contains("without a none")));
    }

    #[test]
    fn test_rejects_none_not_offered() {
        let error = parse(
            r#"{"version": 1, "questions": [
                {"id": "p9", "prompt": "a", "kind": "multiple", "none": "nenhuma",
                 "options": [{"value": "acne", "label": "Acne", "score": 2}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(error, Error::QuestionSet(message) if message.contains("does not offer")));
    }

    #[test]
    fn test_rejects_none_on_single_choice() {
        let error = parse(
            r#"{"version": 1, "questions": [
                {"id": "p1", "prompt": "a", "kind": "yes_no", "none": "nao",
                 "options": [{"value": "nao", "label": "Não", "score": 0}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(error, Error::QuestionSet(_)));
    }

    #[test]
    fn test_rejects_empty_options_and_bad_json() {
        assert!(parse(
            r#"{"version": 1, "questions": [
                {"id": "p1", "prompt": "a", "kind": "single", "options": []}
            ]}"#
        )
        .is_err());
        assert!(matches!(parse("{"), Err(Error::Json(_))));
    }
}
