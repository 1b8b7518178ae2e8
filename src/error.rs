use std::fmt;

use thiserror::Error;

use crate::question::Arity;

#[derive(Debug, Error)]
pub enum Error {
    /// An answer does not fit its question's definition.
    #[error("malformed quiz response: {}", Violations(.0))]
    MalformedResponse(Vec<Violation>),

    /// The caller and the engine run different question-set versions.
    #[error("questions not in the current question set: {}", .0.join(", "))]
    UnknownQuestion(Vec<String>),

    /// The points of all questions together don't fit a score.
    #[error("total score exceeds {}", u32::MAX)]
    ScoreOverflow,

    #[error("invalid question set: {0}")]
    QuestionSet(String),

    #[error("invalid bulk file: {0}")]
    Bulk(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Question ids the caller should highlight, in the order they were found.
    pub fn questions(&self) -> Vec<&str> {
        match self {
            Error::MalformedResponse(violations) => {
                violations.iter().map(Violation::question).collect()
            }
            Error::UnknownQuestion(ids) => ids.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// One rejected answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{0} is not answered")]
    Missing(String),

    #[error("{question} has no option {value:?}")]
    IllegalOption { question: String, value: String },

    #[error("{question} expects a {expected} answer")]
    WrongArity { question: String, expected: Arity },

    #[error("{0} has an empty selection")]
    EmptySelection(String),

    #[error("{0} adds up to more points than a score can hold")]
    Overflow(String),
}

impl Violation {
    pub fn question(&self) -> &str {
        match self {
            Violation::Missing(question)
            | Violation::EmptySelection(question)
            | Violation::Overflow(question) => question,
            Violation::IllegalOption { question, .. } | Violation::WrongArity { question, .. } => {
                question
            }
        }
    }
}

struct Violations<'a>(&'a [Violation]);

impl fmt::Display for Violations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
