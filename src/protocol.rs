//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{self, AgentActionInfo, ConceptSlide, LessonInfo};
use crate::chat::ChatMessage;
use crate::domain::{serialize_js_number, LessonKind, QuizConfig, StoryConfig};
use crate::play::QuizView;
use crate::session::{Lesson, Selection};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListLessons,
    Concepts {
        lesson: LessonKind,
    },
    StartLesson {
        lesson: LessonKind,
    },
    GetSession {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    EndSession {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    EditorChange {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        text: String,
    },
    ToggleEditor {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    AgentAction {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        action: String,
    },
    ChatSend {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        text: String,
    },
    SelectStory {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        #[serde(default)]
        character: Option<String>,
        #[serde(default)]
        genre: Option<String>,
    },
    QuizAnswer {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
        choice: usize,
    },
    QuizNext {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    QuizRestart {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Lessons {
        lessons: Vec<LessonInfo>,
    },
    Concepts {
        lesson: LessonKind,
        slides: Vec<ConceptSlide>,
    },
    Session {
        session: SessionOut,
    },
    Ended {
        #[serde(rename = "sessionId")]
        session_id: Uuid,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for the full session snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub session_id: Uuid,
    pub lesson: LessonKind,
    pub version: u64,
    pub editor: EditorOut,
    pub messages: Vec<ChatMessage>,
    pub actions: Vec<AgentActionInfo>,
    pub preview: PreviewOut,
}

#[derive(Debug, Serialize)]
pub struct EditorOut {
    pub text: String,
    /// Friendly hint while the text does not parse.
    pub error: Option<String>,
    pub open: bool,
    pub language: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "lesson", rename_all = "snake_case")]
pub enum PreviewOut {
    Quiz {
        config: QuizConfig,
        #[serde(serialize_with = "serialize_js_number")]
        score: f64,
        play: QuizView,
    },
    Story {
        config: StoryConfig,
        selection: Selection,
        story: String,
    },
}

/// Convert a live `Lesson` (internal) to the public DTO.
pub fn to_out(session_id: Uuid, lesson: &Lesson) -> SessionOut {
    let kind = lesson.kind();
    let hint = catalog::editor_hint(kind);
    let (editor, messages, preview) = match lesson {
        Lesson::Quiz(q) => {
            let ed = q.editor();
            (
                (ed.text(), ed.error(), ed.is_open()),
                q.chat().messages().to_vec(),
                PreviewOut::Quiz { config: q.config().clone(), score: q.score(), play: q.view() },
            )
        }
        Lesson::Story(s) => {
            let ed = s.editor();
            (
                (ed.text(), ed.error(), ed.is_open()),
                s.chat().messages().to_vec(),
                PreviewOut::Story { config: s.config().clone(), selection: s.selection().clone(), story: s.story() },
            )
        }
    };
    let (text, error, open) = editor;

    SessionOut {
        session_id,
        lesson: kind,
        version: lesson.version(),
        editor: EditorOut {
            text: text.to_string(),
            error: error.map(str::to_string),
            open,
            language: hint.language,
            hint: hint.hint,
        },
        messages,
        actions: catalog::actions(kind),
        preview,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct StartIn {
    pub lesson: LessonKind,
}

#[derive(Deserialize)]
pub struct EditorIn {
    pub text: String,
}

#[derive(Deserialize)]
pub struct ActionIn {
    pub action: String,
}

#[derive(Deserialize)]
pub struct ChatIn {
    pub text: String,
}

#[derive(Deserialize)]
pub struct SelectIn {
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

#[derive(Deserialize)]
pub struct AnswerIn {
    pub choice: usize,
}

#[derive(Serialize)]
pub struct LessonsOut {
    pub lessons: Vec<LessonInfo>,
}

#[derive(Serialize)]
pub struct ConceptsOut {
    pub lesson: LessonKind,
    pub slides: Vec<ConceptSlide>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
