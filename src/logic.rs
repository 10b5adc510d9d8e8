//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting, reading and ending lesson sessions
//!   - Editor changes (parse or keep the previous config)
//!   - Agent actions and free-text chat
//!   - Story selection and quiz play
//!
//! Every session event returns the fresh snapshot so both transports can reply
//! with the same DTO.

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::{self, ConceptSlide, LessonInfo};
use crate::domain::LessonKind;
use crate::error::LessonError;
use crate::protocol::{to_out, SessionOut};
use crate::session::EditOutcome;
use crate::state::AppState;
use crate::util::trunc_for_log;

pub fn lessons() -> Vec<LessonInfo> {
  catalog::lessons()
}

pub fn concepts(lesson: LessonKind) -> Vec<ConceptSlide> {
  catalog::concepts(lesson)
}

#[instrument(level = "info", skip(state), fields(%lesson))]
pub async fn start_lesson(state: &AppState, lesson: LessonKind) -> Result<SessionOut, LessonError> {
  let (id, started) = state.start_session(lesson).await?;
  Ok(to_out(id, &started))
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn get_session(state: &AppState, id: Uuid) -> Result<SessionOut, LessonError> {
  state.with_session(id, |l| Ok(to_out(id, l))).await
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn end_session(state: &AppState, id: Uuid) -> Result<(), LessonError> {
  state.end_session(id).await
}

#[instrument(level = "debug", skip(state, text), fields(%id, text_len = text.len()))]
pub async fn editor_change(state: &AppState, id: Uuid, text: String) -> Result<SessionOut, LessonError> {
  debug!(target: "lesson", session = %id, text = %trunc_for_log(&text, 80), "Editor change");
  state
    .with_session(id, |l| {
      let outcome = l.edit(text);
      if outcome == EditOutcome::Applied {
        debug!(target: "lesson", session = %id, version = l.version(), "Editor text applied");
      }
      Ok(to_out(id, l))
    })
    .await
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn toggle_editor(state: &AppState, id: Uuid) -> Result<SessionOut, LessonError> {
  state
    .with_session(id, |l| {
      l.toggle_editor();
      Ok(to_out(id, l))
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%id, %action))]
pub async fn agent_action(state: &AppState, id: Uuid, action: &str) -> Result<SessionOut, LessonError> {
  state
    .with_session(id, |l| {
      let before = l.version();
      l.act(action, &state.banks, &mut rand::thread_rng())?;
      info!(target: "lesson", session = %id, %action, from = before, to = l.version(), "Agent action applied");
      Ok(to_out(id, l))
    })
    .await
}

#[instrument(level = "info", skip(state, text), fields(%id, text_len = text.len()))]
pub async fn chat_send(state: &AppState, id: Uuid, text: &str) -> Result<SessionOut, LessonError> {
  debug!(target: "lesson", session = %id, text = %trunc_for_log(text, 80), "Chat message");
  state
    .with_session(id, |l| {
      l.send(text);
      Ok(to_out(id, l))
    })
    .await
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn select_story(
  state: &AppState,
  id: Uuid,
  character: Option<String>,
  genre: Option<String>,
) -> Result<SessionOut, LessonError> {
  state
    .with_session(id, |l| {
      l.as_story_mut()?.select(character, genre)?;
      Ok(to_out(id, l))
    })
    .await
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn quiz_answer(state: &AppState, id: Uuid, choice: usize) -> Result<SessionOut, LessonError> {
  state
    .with_session(id, |l| {
      let quiz = l.as_quiz_mut()?;
      let feedback = quiz.answer(choice)?;
      info!(target: "lesson", session = %id, correct = feedback.correct, score = quiz.score(), "Quiz answer");
      Ok(to_out(id, l))
    })
    .await
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn quiz_next(state: &AppState, id: Uuid) -> Result<SessionOut, LessonError> {
  state
    .with_session(id, |l| {
      l.as_quiz_mut()?.next()?;
      Ok(to_out(id, l))
    })
    .await
}

#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn quiz_restart(state: &AppState, id: Uuid) -> Result<SessionOut, LessonError> {
  state
    .with_session(id, |l| {
      l.as_quiz_mut()?.restart();
      Ok(to_out(id, l))
    })
    .await
}
