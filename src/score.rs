use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::question::{Arity, QuestionSet};
use crate::{Answer, Assessment, Error, QuizResponses, Violation};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    question: String,
    arity: Arity,
    none: Option<String>,
    weights: HashMap<String, u32>,
}

impl Row {
    fn weight(&self, value: &str) -> Result<u32, Violation> {
        self.weights
            .get(value)
            .copied()
            .ok_or_else(|| Violation::IllegalOption {
                question: self.question.clone(),
                value: value.to_string(),
            })
    }

    fn contribution(&self, answer: &Answer) -> Result<u32, Violation> {
        match (self.arity, answer) {
            (Arity::Single, Answer::Single(value)) => self.weight(value),
            (Arity::Multiple, Answer::Multiple(values)) => {
                if values.is_empty() {
                    return Err(Violation::EmptySelection(self.question.clone()));
                }
                // every value is checked even when the none option is present
                let mut sum: u32 = 0;
                for value in values {
                    sum = sum
                        .checked_add(self.weight(value)?)
                        .ok_or_else(|| Violation::Overflow(self.question.clone()))?;
                }
                let none_selected = self
                    .none
                    .as_ref()
                    .is_some_and(|none| values.contains(none));
                if none_selected {
                    Ok(0)
                } else {
                    Ok(sum)
                }
            }
            (expected, _) => Err(Violation::WrongArity {
                question: self.question.clone(),
                expected,
            }),
        }
    }
}

/// Weight of every (question, option) pair, in question-set order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    version: u32,
    rows: Vec<Row>,
}

impl From<&QuestionSet> for ScoreTable {
    fn from(set: &QuestionSet) -> Self {
        Self {
            version: set.version(),
            rows: set
                .questions()
                .iter()
                .map(|question| Row {
                    question: question.id.clone(),
                    arity: question.arity(),
                    none: question.none.clone(),
                    weights: question
                        .options
                        .iter()
                        .map(|option| (option.value.clone(), option.score))
                        .collect(),
                })
                .collect(),
        }
    }
}

impl ScoreTable {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn weight(&self, question: &str, value: &str) -> Option<u32> {
        self.row(question)?.weights.get(value).copied()
    }

    /// Total score of a completed submission.
    pub fn compute(&self, responses: &QuizResponses) -> Result<u32, Error> {
        self.breakdown(responses).map(|breakdown| breakdown.total())
    }

    /// Per-question contributions of a completed submission. Every question
    /// must be answered.
    pub fn breakdown(&self, responses: &QuizResponses) -> Result<Breakdown, Error> {
        self.score(responses, true)
    }

    /// Like [`ScoreTable::breakdown`] but unanswered questions are skipped, for
    /// drafts saved before the quiz is finished.
    pub fn partial(&self, responses: &QuizResponses) -> Result<Breakdown, Error> {
        self.score(responses, false)
    }

    fn row(&self, question: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.question == question)
    }

    fn score(&self, responses: &QuizResponses, complete: bool) -> Result<Breakdown, Error> {
        let unknown = responses
            .question_ids()
            .filter(|id| self.row(id).is_none())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            warn!(version = self.version, ?unknown, "responses name unknown questions");
            return Err(Error::UnknownQuestion(unknown));
        }

        let mut contributions = Vec::with_capacity(self.rows.len());
        let mut violations = Vec::new();
        for row in &self.rows {
            match responses.get(&row.question) {
                Some(answer) => match row.contribution(answer) {
                    Ok(points) => contributions.push(Contribution {
                        question: row.question.clone(),
                        points,
                    }),
                    Err(violation) => violations.push(violation),
                },
                None if complete => violations.push(Violation::Missing(row.question.clone())),
                None => {}
            }
        }
        if !violations.is_empty() {
            warn!(count = violations.len(), "rejected malformed quiz response");
            return Err(Error::MalformedResponse(violations));
        }

        let total = contributions
            .iter()
            .try_fold(0u32, |total, contribution| total.checked_add(contribution.points))
            .ok_or_else(|| {
                warn!("quiz response overflows the score");
                Error::ScoreOverflow
            })?;

        let breakdown = Breakdown {
            contributions,
            total,
        };
        debug!(
            answered = breakdown.answered(),
            total = breakdown.total(),
            "scored quiz responses"
        );
        Ok(breakdown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub question: String,
    pub points: u32,
}

/// Points each answered question contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    contributions: Vec<Contribution>,
    total: u32,
}

impl Breakdown {
    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    pub fn points(&self, question: &str) -> Option<u32> {
        self.contributions
            .iter()
            .find(|contribution| contribution.question == question)
            .map(|contribution| contribution.points)
    }

    pub fn answered(&self) -> usize {
        self.contributions.len()
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

impl Assessment for Breakdown {
    fn total_score(&self) -> u32 {
        self.total()
    }
}
