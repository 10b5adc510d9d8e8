//! Loading lesson configuration (content banks) from TOML.
//!
//! Every section is optional; anything left out falls back to the built-in
//! seeds. See `LessonConfig`, `QuizBank` and `StoryBank` for the schema:
//!
//! ```toml
//! [quiz]
//! themes = ["Jungle Quiz", "Volcano Quiz"]
//! points_step = 5
//!
//! [quiz.template_question]
//! prompt = "What color is grass?"
//! choices = ["Green", "Blue"]
//! correctIndex = 0
//!
//! [story]
//! characters = ["Pirate", "Robot"]
//! fallback_character = "Hero"
//!
//! [[story.genres]]
//! name = "Scary"
//! template = "{character} crept through a dark mansion."
//! ```

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::Question;
use crate::seeds::{
  seed_characters, seed_genres, seed_themes, template_question, trick_question,
  FALLBACK_CHARACTER, HARDER_POINTS_STEP,
};

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct LessonConfig {
  #[serde(default)]
  pub quiz: QuizBank,
  #[serde(default)]
  pub story: StoryBank,
}

/// Content the quiz actions draw from.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuizBank {
  pub template_question: Question,
  pub trick_question: Question,
  pub themes: Vec<String>,
  /// Added to `pointsPerQuestion` by "make harder". Must be positive.
  pub points_step: i64,
}

impl Default for QuizBank {
  fn default() -> Self {
    Self {
      template_question: template_question(),
      trick_question: trick_question(),
      themes: seed_themes(),
      points_step: HARDER_POINTS_STEP,
    }
  }
}

/// Content the story actions draw from.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoryBank {
  pub characters: Vec<String>,
  pub fallback_character: String,
  pub genres: Vec<GenreTemplate>,
}

impl Default for StoryBank {
  fn default() -> Self {
    Self {
      characters: seed_characters(),
      fallback_character: FALLBACK_CHARACTER.to_string(),
      genres: seed_genres()
        .into_iter()
        .map(|(name, template)| GenreTemplate { name, template })
        .collect(),
    }
  }
}

/// Genre entry of the story bank. `template` uses the `{character}` placeholder.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GenreTemplate {
  pub name: String,
  pub template: String,
}

impl LessonConfig {
  /// Parse TOML and repair values the actions cannot work with.
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    let cfg = toml::from_str::<LessonConfig>(s)?;
    Ok(cfg.sanitized())
  }

  fn sanitized(mut self) -> Self {
    if self.quiz.points_step < 1 {
      warn!(target: "buildbuddy", points_step = self.quiz.points_step, "points_step must be positive; using default");
      self.quiz.points_step = HARDER_POINTS_STEP;
    }
    if self.story.fallback_character.trim().is_empty() {
      warn!(target: "buildbuddy", "Empty fallback_character; using default");
      self.story.fallback_character = FALLBACK_CHARACTER.to_string();
    }
    self
  }
}

/// Attempt to load `LessonConfig` from LESSON_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_lesson_config_from_env() -> Option<LessonConfig> {
  let path = std::env::var("LESSON_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match LessonConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "buildbuddy", %path, themes = cfg.quiz.themes.len(), characters = cfg.story.characters.len(), genres = cfg.story.genres.len(), "Loaded lesson config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "buildbuddy", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "buildbuddy", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
