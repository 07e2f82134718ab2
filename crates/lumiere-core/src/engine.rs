//! Quiz engine.
//!
//! Turns a set of vocabulary items into a shuffled, mixed-type quiz session,
//! grades answers, and records mistakes.
//!
//! Lifecycle of a session: `InProgress(0) -> InProgress(1) -> ... -> Completed`.
//! Nothing moves backwards and nothing leaves `Completed`. Grading and
//! advancing are separate steps so the caller can show the result of an
//! answer before moving on.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuizError;
use crate::ledger::MistakeLedger;
use crate::model::VocabularyItem;
use crate::random::{shuffle, RandomSource, StdRandom};
use crate::traits::{Cue, CuePlayer};

/// Number of wrong options offered alongside the right one.
pub const DISTRACTOR_COUNT: usize = 3;

/// Probability that an item becomes a choice question.
const CHOICE_PROBABILITY: f64 = 0.5;

/// The shape of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick the translation of the headword from `options`.
    Choice { options: Vec<String> },
    /// Type the headword for the shown translation.
    Production,
}

/// One generated question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub item: VocabularyItem,
    pub kind: QuestionKind,
}

impl Question {
    /// What the learner is shown.
    pub fn prompt(&self) -> &str {
        match self.kind {
            QuestionKind::Choice { .. } => &self.item.headword,
            QuestionKind::Production => &self.item.translation,
        }
    }

    pub fn correct_answer(&self) -> &str {
        match self.kind {
            QuestionKind::Choice { .. } => &self.item.translation,
            QuestionKind::Production => &self.item.headword,
        }
    }

    /// Answer options; empty for production questions.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::Choice { options } => options.as_slice(),
            QuestionKind::Production => &[],
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, QuestionKind::Choice { .. })
    }
}

/// Result of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_answer: String,
}

/// An in-progress or finished quiz. Never persisted.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    questions: Vec<Question>,
    cursor: usize,
    score: usize,
    completed: bool,
    current_answered: bool,
}

impl QuizSession {
    fn new(questions: Vec<Question>) -> Self {
        let now = Utc::now();
        // An empty quiz is trivially complete.
        let completed = questions.is_empty();
        Self {
            id: Uuid::new_v4(),
            started_at: now,
            finished_at: completed.then_some(now),
            questions,
            cursor: 0,
            score: 0,
            completed,
            current_answered: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
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

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether the current question has been graded.
    pub fn is_answered(&self) -> bool {
        self.current_answered
    }

    /// The question under the cursor, if the session is still running.
    pub fn current(&self) -> Option<&Question> {
        if self.completed {
            return None;
        }
        self.questions.get(self.cursor)
    }

    /// Fraction of the run completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 1.0;
        }
        self.cursor as f64 / self.questions.len() as f64
    }

    /// Final result, available once the session is completed.
    pub fn summary(&self) -> Option<QuizSummary> {
        let finished_at = self.finished_at?;
        let total = self.questions.len();
        Some(QuizSummary {
            session_id: self.id,
            score: self.score,
            total,
            accuracy: if total == 0 {
                0.0
            } else {
                self.score as f64 / total as f64
            },
            started_at: self.started_at,
            finished_at,
        })
    }
}

/// Result of a completed quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub session_id: Uuid,
    pub score: usize,
    pub total: usize,
    /// `score / total`, 0 for an empty quiz.
    pub accuracy: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// The quiz engine.
pub struct QuizEngine {
    random: Box<dyn RandomSource>,
    ledger: MistakeLedger,
    cues: Arc<dyn CuePlayer>,
    fallback_pool: Vec<VocabularyItem>,
}

impl QuizEngine {
    pub fn new(ledger: MistakeLedger, cues: Arc<dyn CuePlayer>) -> Self {
        Self {
            random: Box::new(StdRandom::from_os()),
            ledger,
            cues,
            fallback_pool: Vec::new(),
        }
    }

    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    /// Items used to top up choice options when the session's own items
    /// cannot supply enough distractors (typically the whole curriculum).
    pub fn with_fallback_pool(mut self, pool: Vec<VocabularyItem>) -> Self {
        self.fallback_pool = pool;
        self
    }

    /// Build a shuffled session with one question per item.
    pub fn generate_session(&mut self, items: &[VocabularyItem]) -> QuizSession {
        let mut questions: Vec<Question> = items
            .iter()
            .map(|item| {
                let kind = if self.random.next_f64() < CHOICE_PROBABILITY {
                    let mut options = self.pick_distractors(item, items);
                    options.push(item.translation.clone());
                    shuffle(&mut options, self.random.as_mut());
                    QuestionKind::Choice { options }
                } else {
                    QuestionKind::Production
                };
                Question {
                    item: item.clone(),
                    kind,
                }
            })
            .collect();

        shuffle(&mut questions, self.random.as_mut());

        let session = QuizSession::new(questions);
        tracing::debug!(
            session = %session.id,
            questions = session.len(),
            choice = session.questions.iter().filter(|q| q.is_choice()).count(),
            "generated quiz session"
        );
        session
    }

    /// Grade `raw_answer` against the current question.
    ///
    /// Comparison ignores surrounding whitespace and case. A wrong answer
    /// adds the item to the mistake ledger. The cursor does not move.
    pub fn submit_answer(
        &self,
        session: &mut QuizSession,
        raw_answer: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        if session.completed {
            return Err(invalid_state("cannot answer a completed quiz"));
        }
        if session.current_answered {
            return Err(invalid_state(&format!(
                "question {} was already answered",
                session.cursor
            )));
        }
        let Some(question) = session.questions.get(session.cursor) else {
            return Err(invalid_state(&format!(
                "cursor {} is out of bounds for {} questions",
                session.cursor,
                session.questions.len()
            )));
        };

        let correct_answer = question.correct_answer().to_string();
        let item_id = question.item.id.clone();
        let is_correct = normalize_answer(raw_answer) == normalize_answer(&correct_answer);
        session.current_answered = true;

        if is_correct {
            session.score += 1;
            self.cues.play_cue(Cue::Correct);
        } else {
            self.cues.play_cue(Cue::Incorrect);
            if let Err(e) = self.ledger.record(&item_id) {
                tracing::error!(item = %item_id, "failed to record mistake: {e}");
            }
        }

        Ok(AnswerOutcome {
            is_correct,
            correct_answer,
        })
    }

    /// Move to the next question, completing the session after the last one.
    pub fn advance(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        if session.completed {
            return Err(invalid_state("cannot advance a completed quiz"));
        }
        session.cursor += 1;
        session.current_answered = false;
        if session.cursor >= session.questions.len() {
            session.completed = true;
            session.finished_at = Some(Utc::now());
            tracing::debug!(
                session = %session.id,
                score = session.score,
                total = session.questions.len(),
                "quiz completed"
            );
        }
        Ok(())
    }

    /// Up to `DISTRACTOR_COUNT` translations other than the target's, drawn
    /// from `items` first and then from the fallback pool.
    fn pick_distractors(&mut self, target: &VocabularyItem, items: &[VocabularyItem]) -> Vec<String> {
        let mut chosen = Vec::with_capacity(DISTRACTOR_COUNT);
        fill_distractors(target, items, &mut chosen, self.random.as_mut());
        if chosen.len() < DISTRACTOR_COUNT && !self.fallback_pool.is_empty() {
            fill_distractors(
                target,
                &self.fallback_pool,
                &mut chosen,
                self.random.as_mut(),
            );
        }
        chosen
    }
}

fn fill_distractors(
    target: &VocabularyItem,
    pool: &[VocabularyItem],
    chosen: &mut Vec<String>,
    random: &mut dyn RandomSource,
) {
    let mut seen: HashSet<String> = chosen.iter().map(|c| normalize_answer(c)).collect();
    seen.insert(normalize_answer(&target.translation));

    let mut candidates: Vec<&str> = pool
        .iter()
        .filter(|w| w.id != target.id)
        .map(|w| w.translation.as_str())
        .filter(|t| seen.insert(normalize_answer(t)))
        .collect();
    shuffle(&mut candidates, random);

    let needed = DISTRACTOR_COUNT.saturating_sub(chosen.len());
    chosen.extend(candidates.into_iter().take(needed).map(str::to_string));
}

/// Trim and case-fold an answer for comparison.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

fn invalid_state(message: &str) -> QuizError {
    tracing::error!("quiz contract violation: {message}");
    QuizError::InvalidState(message.to_string())
}
