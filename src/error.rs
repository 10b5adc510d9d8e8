//! Errors surfaced by lesson operations (HTTP and WebSocket alike).
//!
//! Malformed editor text is not an error here: it is stored on the session
//! as a display string and never travels as an error.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::LessonKind;
use crate::play::PlayError;
use crate::transcoder::{Dialect, ParseError};

#[derive(Debug, Error)]
pub enum LessonError {
  #[error("Unknown session: {0}")]
  UnknownSession(Uuid),

  #[error("Unknown action '{action}' for the {lesson} lesson")]
  UnknownAction { lesson: LessonKind, action: String },

  #[error("Session is not a {expected} lesson")]
  WrongLesson { expected: LessonKind },

  #[error("'{0}' is not in the story")]
  UnknownSelection(String),

  #[error(transparent)]
  Play(#[from] PlayError),

  #[error("Built-in {dialect} document does not parse: {detail}")]
  DefaultDocument { dialect: Dialect, detail: String },
}

impl From<ParseError> for LessonError {
  // Only the built-in starting documents are parsed on a fallible path.
  fn from(e: ParseError) -> Self {
    LessonError::DefaultDocument { dialect: e.dialect, detail: e.detail }
  }
}
