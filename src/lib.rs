//! Scoring and inflammation classification for the initial self-assessment
//! quiz.
//!
//! Answers are scored question by question against the weights of the
//! questionnaire master and summed. Multi-choice questions add up every
//! selected option unless the "none of the above" option is among the
//! selection, in which case the whole question counts zero. The total is
//! then classified:
//!
//! | score | tier |
//! |---|---|
//! | 0 – 30 | low |
//! | 31 – 60 | moderate |
//! | 61 and above | high |
//!
//! Everything here is a pure function over the static tables; storing the
//! attempt and rendering the result are up to the caller.
use once_cell::sync::Lazy;

pub mod attempt;
pub mod bulk;
pub mod error;
pub mod question;
pub mod response;
pub mod score;
pub mod tier;

pub use attempt::{NewQuizAttempt, QuizAttempt, QuizHistoryItem};
pub use bulk::read_bulk;
pub use error::{Error, Violation};
pub use question::{Arity, Question, QuestionKind, QuestionOption, QuestionSet};
pub use response::{Answer, QuizResponses};
pub use score::{Breakdown, Contribution, ScoreTable};
pub use tier::{classify, describe, Color, InflammationResult, Tier};

/// The questionnaire master, embedded at build time.
pub static QUESTIONS: Lazy<QuestionSet> = Lazy::new(|| {
    include_str!("../resources/questions.json")
        .parse()
        .expect("embedded question set is consistent")
});

pub static SCORES: Lazy<ScoreTable> = Lazy::new(|| ScoreTable::from(&*QUESTIONS));

/// Total score of a completed submission against the embedded questionnaire.
pub fn compute_score(responses: &QuizResponses) -> Result<u32, Error> {
    SCORES.compute(responses)
}

pub trait Assessment {
    fn total_score(&self) -> u32;

    fn tier(&self) -> Tier {
        classify(self.total_score())
    }

    fn result(&self) -> &'static InflammationResult {
        describe(self.tier())
    }
}
