//! Quiz play: question index, score, and answer feedback for one config version.
//!
//! Play state belongs to a specific config version. When the editor or an
//! agent action produces a new version, play starts over from the first
//! question instead of patching the old progress.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{serialize_js_number, Question, QuizConfig};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("Add some questions to get started!")]
    NoQuestions,
    #[error("This question was already answered.")]
    AlreadyAnswered,
    #[error("Answer the question first.")]
    NotAnswered,
    #[error("The quiz is finished. Restart to play again.")]
    Finished,
    #[error("Choice {0} does not exist.")]
    NoSuchChoice(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub correct: bool,
    pub text: String,
}

/// What the quiz preview shows right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizView {
    NoQuestions {
        message: String,
    },
    Question {
        title: String,
        /// 1-based, for "Question n of m".
        number: usize,
        total: usize,
        #[serde(serialize_with = "serialize_js_number")]
        score: f64,
        prompt: String,
        choices: Vec<String>,
        answered: Option<usize>,
        /// Only revealed once the question is answered.
        correct_index: Option<i64>,
        feedback: Option<Feedback>,
        next_label: Option<String>,
    },
    Finished {
        title: String,
        #[serde(serialize_with = "serialize_js_number")]
        score: f64,
        #[serde(serialize_with = "serialize_js_number")]
        max_score: f64,
        perfect: bool,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuizPlay {
    version: u64,
    current: usize,
    score: f64,
    answered: Option<usize>,
    feedback: Option<Feedback>,
    finished: bool,
}

impl QuizPlay {
    pub fn new(version: u64) -> Self {
        Self { version, ..Self::default() }
    }

    /// Start over if `version` is not the one this play belongs to.
    pub fn sync(&mut self, version: u64) {
        if self.version != version {
            *self = Self::new(version);
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn view(&self, config: &QuizConfig) -> QuizView {
        let total = config.questions.len();
        if total == 0 {
            return QuizView::NoQuestions { message: PlayError::NoQuestions.to_string() };
        }
        if self.finished {
            let max_score = max_score(config);
            let perfect = self.score == max_score;
            return QuizView::Finished {
                title: config.title.clone(),
                score: self.score,
                max_score,
                perfect,
                message: if perfect {
                    "Perfect score! You're a genius!".into()
                } else {
                    "Nice try! Want to go again?".into()
                },
            };
        }
        let Some(question) = config.questions.get(self.current) else {
            return QuizView::NoQuestions { message: PlayError::NoQuestions.to_string() };
        };
        let answered = self.answered;
        QuizView::Question {
            title: config.title.clone(),
            number: self.current + 1,
            total,
            score: self.score,
            prompt: question.prompt(),
            choices: question.choices(),
            answered,
            correct_index: answered.and_then(|_| question.correct_index()),
            feedback: self.feedback.clone(),
            next_label: answered.map(|_| {
                if self.current + 1 < total { "Next Question".into() } else { "See Results".into() }
            }),
        }
    }

    /// Pick `choice` for the current question. Each question takes one answer.
    pub fn answer(&mut self, config: &QuizConfig, choice: usize) -> Result<Feedback, PlayError> {
        let question = self.current_question(config)?;
        if self.answered.is_some() {
            return Err(PlayError::AlreadyAnswered);
        }
        if choice >= question.choices().len() {
            return Err(PlayError::NoSuchChoice(choice));
        }

        let correct = question.correct_index().is_some_and(|i| usize::try_from(i) == Ok(choice));
        let feedback = if correct {
            Feedback { correct, text: "Correct! Great job!".into() }
        } else {
            let expected = question.correct_choice().unwrap_or_else(|| "(no correct choice set)".into());
            Feedback { correct, text: format!("Oops! The answer was: {expected}") }
        };
        if correct {
            self.score += config.points_per_question;
        }
        self.answered = Some(choice);
        self.feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// Move past an answered question; after the last one the quiz finishes.
    pub fn next(&mut self, config: &QuizConfig) -> Result<(), PlayError> {
        self.current_question(config)?;
        if self.answered.is_none() {
            return Err(PlayError::NotAnswered);
        }
        if self.current + 1 < config.questions.len() {
            self.current += 1;
            self.answered = None;
            self.feedback = None;
        } else {
            self.finished = true;
        }
        Ok(())
    }

    pub fn restart(&mut self) {
        *self = Self::new(self.version);
    }

    fn current_question<'c>(&self, config: &'c QuizConfig) -> Result<&'c Question, PlayError> {
        if config.questions.is_empty() {
            return Err(PlayError::NoQuestions);
        }
        if self.finished {
            return Err(PlayError::Finished);
        }
        config.questions.get(self.current).ok_or(PlayError::NoQuestions)
    }
}

fn max_score(config: &QuizConfig) -> f64 {
    config.questions.len() as f64 * config.points_per_question
}
