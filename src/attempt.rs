use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Assessment, Error, QuizResponses, ScoreTable};

/// Scores submitted responses. Completed submissions must answer every
/// question; drafts are scored on what has been answered so far.
fn score(table: &ScoreTable, responses: &QuizResponses, is_completed: bool) -> Result<u32, Error> {
    if is_completed {
        table.compute(responses)
    } else {
        table.partial(responses).map(|breakdown| breakdown.total())
    }
}

/// Insert payload for the `quiz_responses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuizAttempt {
    pub user_id: String,
    pub responses: QuizResponses,
    pub total_score: u32,
    pub is_completed: bool,
}

impl NewQuizAttempt {
    pub fn new(
        table: &ScoreTable,
        user_id: impl Into<String>,
        responses: QuizResponses,
        is_completed: bool,
    ) -> Result<Self, Error> {
        let total_score = score(table, &responses, is_completed)?;
        Ok(Self {
            user_id: user_id.into(),
            responses,
            total_score,
            is_completed,
        })
    }

    /// The stored row once the backing store has assigned an id.
    pub fn into_record(self, id: u64, now: DateTime<Utc>) -> QuizAttempt {
        QuizAttempt {
            id,
            user_id: self.user_id,
            responses: self.responses,
            total_score: self.total_score,
            is_completed: self.is_completed,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Assessment for NewQuizAttempt {
    fn total_score(&self) -> u32 {
        self.total_score
    }
}

/// A row of the `quiz_responses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: u64,
    pub user_id: String,
    pub responses: QuizResponses,
    pub total_score: u32,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizAttempt {
    /// Replaces the answers of an existing attempt. The row is left untouched
    /// when the new responses don't score.
    pub fn update(
        &mut self,
        table: &ScoreTable,
        responses: QuizResponses,
        is_completed: bool,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        let total_score = score(table, &responses, is_completed)?;
        debug!(
            id = self.id,
            previous = self.total_score,
            total_score,
            "updated quiz attempt"
        );
        self.responses = responses;
        self.total_score = total_score;
        self.is_completed = is_completed;
        self.updated_at = now;
        Ok(())
    }

    /// Recomputes the score from the stored responses, e.g. after loading a
    /// row written by another client.
    pub fn rescore(&self, table: &ScoreTable) -> Result<u32, Error> {
        let total_score = score(table, &self.responses, self.is_completed)?;
        if total_score != self.total_score {
            warn!(
                id = self.id,
                stored = self.total_score,
                total_score,
                "stored score differs from its responses"
            );
        }
        Ok(total_score)
    }

    pub fn history_item(&self) -> QuizHistoryItem {
        QuizHistoryItem::from(self)
    }
}

impl Assessment for QuizAttempt {
    fn total_score(&self) -> u32 {
        self.total_score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizHistoryItem {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub total_score: u32,
    pub is_completed: bool,
}

impl From<&QuizAttempt> for QuizHistoryItem {
    fn from(attempt: &QuizAttempt) -> Self {
        Self {
            id: attempt.id,
            created_at: attempt.created_at,
            total_score: attempt.total_score,
            is_completed: attempt.is_completed,
        }
    }
}

impl Assessment for QuizHistoryItem {
    fn total_score(&self) -> u32 {
        self.total_score
    }
}
