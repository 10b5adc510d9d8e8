//! Application state: content banks and the in-memory lesson sessions.
//!
//! This module owns:
//!   - the content banks (from TOML or built-in seeds)
//!   - every live lesson session, keyed by session id
//!
//! Each event takes the store's write lock for the duration of one synchronous
//! step, so two events never touch a session at the same time. Sessions are
//! never persisted; they disappear when ended or when the process exits.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{load_lesson_config_from_env, LessonConfig};
use crate::domain::LessonKind;
use crate::error::LessonError;
use crate::session::Lesson;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, Lesson>>>,
    pub banks: Arc<LessonConfig>,
}

impl AppState {
    /// Build state from env: load content banks, start with no sessions.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let banks = match load_lesson_config_from_env() {
            Some(cfg) => cfg,
            None => {
                info!(target: "buildbuddy", "Using built-in content banks.");
                LessonConfig::default()
            }
        };
        info!(
            target: "buildbuddy",
            themes = banks.quiz.themes.len(),
            characters = banks.story.characters.len(),
            genres = banks.story.genres.len(),
            "Content bank inventory"
        );
        Self::with_banks(banks)
    }

    pub fn with_banks(banks: LessonConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            banks: Arc::new(banks),
        }
    }

    /// Start a lesson from its default document and register it.
    #[instrument(level = "info", skip(self), fields(%kind))]
    pub async fn start_session(&self, kind: LessonKind) -> Result<(Uuid, Lesson), LessonError> {
        let lesson = Lesson::start(kind)?;
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, lesson.clone());
        info!(target: "lesson", session = %id, %kind, "Session started");
        Ok((id, lesson))
    }

    /// Handle one event on a session under the write lock.
    #[instrument(level = "debug", skip(self, f), fields(%id))]
    pub async fn with_session<T, F>(&self, id: Uuid, f: F) -> Result<T, LessonError>
    where
        F: FnOnce(&mut Lesson) -> Result<T, LessonError>,
    {
        let mut sessions = self.sessions.write().await;
        let lesson = sessions.get_mut(&id).ok_or(LessonError::UnknownSession(id))?;
        let out = f(lesson)?;
        debug!(target: "lesson", session = %id, version = lesson.version(), "Session event handled");
        Ok(out)
    }

    /// Drop a session and everything in it.
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn end_session(&self, id: Uuid) -> Result<(), LessonError> {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(lesson) => {
                info!(target: "lesson", session = %id, kind = %lesson.kind(), "Session ended");
                Ok(())
            }
            None => Err(LessonError::UnknownSession(id)),
        }
    }
}
