//! Domain models shared by both lessons: quiz config, story config, and lesson kinds.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

/// Which lesson a session is running.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
  Quiz,
  Story,
}

impl fmt::Display for LessonKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LessonKind::Quiz => f.write_str("quiz"),
      LessonKind::Story => f.write_str("story"),
    }
  }
}

/// One multiple-choice question, held exactly as the document wrote it.
///
/// Nothing about its shape is checked: a question may be any JSON value, and
/// keys the player does not know about are kept (in order) for the next
/// serialization. The accessors read it the way the quiz preview renders it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Question(Value);

impl Question {
  pub fn new(prompt: &str, choices: &[&str], correct_index: i64) -> Self {
    Self(json!({ "prompt": prompt, "choices": choices, "correctIndex": correct_index }))
  }

  /// Prompt text; a missing or null prompt renders as nothing.
  pub fn prompt(&self) -> String {
    self.0.get("prompt").map(display_value).unwrap_or_default()
  }

  /// Choice texts; anything but an array means no choices.
  pub fn choices(&self) -> Vec<String> {
    self.0
      .get("choices")
      .and_then(Value::as_array)
      .map(|items| items.iter().map(display_value).collect())
      .unwrap_or_default()
  }

  /// `correctIndex` when it is a whole number. Strings, null, or fractions
  /// never equal a picked index.
  pub fn correct_index(&self) -> Option<i64> {
    let n = self.0.get("correctIndex")?;
    n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15).map(|f| f as i64))
  }

  /// The choice text at `correct_index`, if the index is in range.
  pub fn correct_choice(&self) -> Option<String> {
    let i = usize::try_from(self.correct_index()?).ok()?;
    self.choices().into_iter().nth(i)
  }
}

/// Text of a JSON value as it shows up on screen.
fn display_value(v: &Value) -> String {
  match v {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    Value::Number(n) => n.as_f64().map(js_number).unwrap_or_else(|| n.to_string()),
    other => other.to_string(),
  }
}

/// Print a number the way JavaScript does: whole values carry no fraction.
pub fn js_number(n: f64) -> String {
  if n.fract() == 0.0 && n.abs() < 1.0e15 {
    format!("{}", n as i64)
  } else {
    format!("{n}")
  }
}

/// `serialize_with` companion of [`js_number`].
pub fn serialize_js_number<S: Serializer>(n: &f64, s: S) -> Result<S::Ok, S::Error> {
  if n.fract() == 0.0 && n.abs() < 1.0e15 {
    s.serialize_i64(*n as i64)
  } else {
    s.serialize_f64(*n)
  }
}

/// Structured form of the quiz editor document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
  pub title: String,
  /// Any JSON number; fractions are allowed.
  #[serde(serialize_with = "serialize_js_number")]
  pub points_per_question: f64,
  pub questions: Vec<Question>,
}

/// Structured form of the story generator snippet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoryConfig {
  pub characters: Vec<String>,
  pub story_types: Vec<String>,
  /// Genre name -> template using the `{character}` placeholder.
  pub templates: BTreeMap<String, String>,
}

impl StoryConfig {
  /// Template for `genre`. An empty template counts as missing.
  pub fn template(&self, genre: &str) -> Option<&str> {
    self.templates
      .get(genre)
      .map(String::as_str)
      .filter(|t| !t.is_empty())
  }
}
