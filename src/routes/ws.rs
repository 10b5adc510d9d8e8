//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::error::LessonError;
use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage, SessionOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "buildbuddy", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "buildbuddy", "WebSocket connected");
  let mut owned = OwnedSessions::default();
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "buildbuddy", "WS received: {:?}", &incoming);
            let starts = matches!(incoming, ClientWsMessage::StartLesson { .. });
            let reply = handle_client_ws(incoming, &state).await;
            owned.track(starts, &reply);
            reply
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "buildbuddy", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  owned.release(&state).await;
  info!(target: "buildbuddy", "WebSocket disconnected");
}

/// Sessions started over one socket. They end when the socket goes away.
#[derive(Debug, Default)]
struct OwnedSessions(Vec<Uuid>);

impl OwnedSessions {
  fn track(&mut self, started: bool, reply: &ServerWsMessage) {
    match reply {
      ServerWsMessage::Session { session } if started => self.0.push(session.session_id),
      ServerWsMessage::Ended { session_id } => self.0.retain(|id| id != session_id),
      _ => {}
    }
  }

  async fn release(self, state: &AppState) {
    for id in self.0 {
      // Already gone if another client ended it.
      if end_session(state, id).await.is_err() {
        debug!(target: "lesson", session = %id, "Session already ended");
      }
    }
  }
}

fn session_reply(res: Result<SessionOut, LessonError>) -> ServerWsMessage {
  match res {
    Ok(session) => ServerWsMessage::Session { session },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListLessons => ServerWsMessage::Lessons { lessons: lessons() },

    ClientWsMessage::Concepts { lesson } => ServerWsMessage::Concepts { lesson, slides: concepts(lesson) },

    ClientWsMessage::StartLesson { lesson } => {
      let res = start_lesson(state, lesson).await;
      if let Ok(s) = &res {
        info!(target: "lesson", session = %s.session_id, %lesson, "WS session started");
      }
      session_reply(res)
    }

    ClientWsMessage::GetSession { session_id } => session_reply(get_session(state, session_id).await),

    ClientWsMessage::EndSession { session_id } => match end_session(state, session_id).await {
      Ok(()) => ServerWsMessage::Ended { session_id },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::EditorChange { session_id, text } => session_reply(editor_change(state, session_id, text).await),

    ClientWsMessage::ToggleEditor { session_id } => session_reply(toggle_editor(state, session_id).await),

    ClientWsMessage::AgentAction { session_id, action } => {
      session_reply(agent_action(state, session_id, &action).await)
    }

    ClientWsMessage::ChatSend { session_id, text } => session_reply(chat_send(state, session_id, &text).await),

    ClientWsMessage::SelectStory { session_id, character, genre } => {
      session_reply(select_story(state, session_id, character, genre).await)
    }

    ClientWsMessage::QuizAnswer { session_id, choice } => session_reply(quiz_answer(state, session_id, choice).await),

    ClientWsMessage::QuizNext { session_id } => session_reply(quiz_next(state, session_id).await),

    ClientWsMessage::QuizRestart { session_id } => session_reply(quiz_restart(state, session_id).await),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::LessonConfig;
  use crate::domain::LessonKind;
  use crate::protocol::PreviewOut;

  fn parse(raw: serde_json::Value) -> ClientWsMessage {
    serde_json::from_value(raw).unwrap()
  }

  #[tokio::test]
  async fn story_session_over_ws_messages() {
    let state = AppState::with_banks(LessonConfig::default());
    let reply = handle_client_ws(parse(serde_json::json!({ "type": "start_lesson", "lesson": "story" })), &state).await;
    let id = match reply {
      ServerWsMessage::Session { session } => session.session_id,
      other => panic!("unexpected {other:?}"),
    };

    let msg = parse(serde_json::json!({ "type": "agent_action", "sessionId": id, "action": "add_genre" }));
    match handle_client_ws(msg, &state).await {
      ServerWsMessage::Session { session } => {
        assert_eq!(session.version, 2);
        assert!(session.editor.text.contains("storyType === \"Scary\""));
        assert!(matches!(session.preview, PreviewOut::Story { ref config, .. } if config.story_types.len() == 4));
      }
      other => panic!("unexpected {other:?}"),
    }

    let msg = parse(serde_json::json!({ "type": "select_story", "sessionId": id, "character": "Nobody" }));
    assert!(matches!(handle_client_ws(msg, &state).await, ServerWsMessage::Error { .. }));

    let msg = parse(serde_json::json!({ "type": "end_session", "sessionId": id }));
    assert!(matches!(handle_client_ws(msg, &state).await, ServerWsMessage::Ended { session_id } if session_id == id));
  }

  #[tokio::test]
  async fn ping_and_catalog() {
    let state = AppState::with_banks(LessonConfig::default());
    assert!(matches!(handle_client_ws(ClientWsMessage::Ping, &state).await, ServerWsMessage::Pong));
    match handle_client_ws(ClientWsMessage::Concepts { lesson: LessonKind::Quiz }, &state).await {
      ServerWsMessage::Concepts { slides, .. } => assert_eq!(slides[0].title, "Arrays of Objects"),
      other => panic!("unexpected {other:?}"),
    }
  }

  #[tokio::test]
  async fn closing_socket_ends_only_its_own_sessions() {
    let state = AppState::with_banks(LessonConfig::default());
    let (foreign, _) = state.start_session(LessonKind::Quiz).await.unwrap();

    let mut owned = OwnedSessions::default();
    let mut ids = Vec::new();
    for lesson in ["quiz", "story", "story"] {
      let reply = handle_client_ws(parse(serde_json::json!({ "type": "start_lesson", "lesson": lesson })), &state).await;
      owned.track(true, &reply);
      if let ServerWsMessage::Session { session } = &reply {
        ids.push(session.session_id);
      }
    }
    // Reading someone else's session does not adopt it.
    let reply = handle_client_ws(parse(serde_json::json!({ "type": "get_session", "sessionId": foreign })), &state).await;
    owned.track(false, &reply);

    // One is ended explicitly before the socket closes.
    let reply = handle_client_ws(parse(serde_json::json!({ "type": "end_session", "sessionId": ids[0] })), &state).await;
    owned.track(false, &reply);
    assert_eq!(owned.0, ids[1..].to_vec());
    assert_eq!(state.sessions.read().await.len(), 3);

    owned.release(&state).await;
    let sessions = state.sessions.read().await;
    assert_eq!(sessions.len(), 1);
    assert!(sessions.contains_key(&foreign));
  }
}
