//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; lesson errors map to status codes below.

use std::sync::Arc;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::LessonKind;
use crate::error::LessonError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

type ApiResult = Result<Json<SessionOut>, LessonError>;

impl IntoResponse for LessonError {
  fn into_response(self) -> Response {
    let status = match &self {
      LessonError::UnknownSession(_) => StatusCode::NOT_FOUND,
      LessonError::UnknownAction { .. } | LessonError::UnknownSelection(_) => StatusCode::BAD_REQUEST,
      LessonError::WrongLesson { .. } | LessonError::Play(_) => StatusCode::CONFLICT,
      LessonError::DefaultDocument { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
      tracing::error!(target: "buildbuddy", error = %self, "Request failed");
    } else {
      warn!(target: "lesson", %status, error = %self, "Request rejected");
    }
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn http_lessons() -> impl IntoResponse { Json(LessonsOut { lessons: lessons() }) }

#[instrument(level = "info")]
pub async fn http_concepts(Path(lesson): Path<LessonKind>) -> impl IntoResponse {
  Json(ConceptsOut { lesson, slides: concepts(lesson) })
}

#[instrument(level = "info", skip(state, body), fields(lesson = %body.lesson))]
pub async fn http_create_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<(StatusCode, Json<SessionOut>), LessonError> {
  let out = start_lesson(&state, body.lesson).await?;
  info!(target: "lesson", session = %out.session_id, lesson = %body.lesson, "HTTP session created");
  Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult {
  Ok(Json(get_session(&state, id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, LessonError> {
  end_session(&state, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_editor_change(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<EditorIn>,
) -> ApiResult {
  Ok(Json(editor_change(&state, id, body.text).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_toggle_editor(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult {
  Ok(Json(toggle_editor(&state, id).await?))
}

#[instrument(level = "info", skip(state, body), fields(action = %body.action))]
pub async fn http_agent_action(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ActionIn>,
) -> ApiResult {
  Ok(Json(agent_action(&state, id, &body.action).await?))
}

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len()))]
pub async fn http_chat_send(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ChatIn>,
) -> ApiResult {
  Ok(Json(chat_send(&state, id, &body.text).await?))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_select_story(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SelectIn>,
) -> ApiResult {
  Ok(Json(select_story(&state, id, body.character, body.genre).await?))
}

#[instrument(level = "info", skip(state, body), fields(choice = body.choice))]
pub async fn http_quiz_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AnswerIn>,
) -> ApiResult {
  Ok(Json(quiz_answer(&state, id, body.choice).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_quiz_next(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult {
  Ok(Json(quiz_next(&state, id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_quiz_restart(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult {
  Ok(Json(quiz_restart(&state, id).await?))
}
