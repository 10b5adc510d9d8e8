//! Quiz dialect: a JSON object with `//` line comments.
//!
//! Parsing strips comments and reads the rest as JSON; serializing re-emits a
//! fixed, commented layout. Comments are regenerated rather than preserved, so
//! anything the user wrote in a comment is gone after an agent action.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::config::QuizBank;
use crate::domain::{js_number, QuizConfig};
use crate::transcoder::{Dialect, ParseError, Transcoder};

#[derive(Clone, Copy, Debug)]
pub struct QuizDialect;

impl Transcoder for QuizDialect {
    type Config = QuizConfig;

    const DIALECT: Dialect = Dialect::Quiz;

    fn parse(text: &str) -> Result<QuizConfig, ParseError> {
        let fail = |detail: String| ParseError::new(Self::DIALECT, detail);

        let cleaned = strip_comments(text);
        let value: Value = serde_json::from_str(&cleaned).map_err(|e| fail(format!("invalid JSON: {e}")))?;

        let obj = value.as_object().ok_or_else(|| fail("top level is not an object".into()))?;
        if !obj.get("title").is_some_and(Value::is_string) {
            return Err(fail("\"title\" must be a string".into()));
        }
        if !obj.get("pointsPerQuestion").is_some_and(Value::is_number) {
            return Err(fail("\"pointsPerQuestion\" must be a number".into()));
        }
        if !obj.get("questions").is_some_and(Value::is_array) {
            return Err(fail("\"questions\" must be an array".into()));
        }

        serde_json::from_value(value).map_err(|e| fail(format!("unsupported value: {e}")))
    }

    fn serialize(config: &QuizConfig) -> String {
        let lines = [
            "{".to_string(),
            "  // --- Code Editor ---".to_string(),
            "  // \"title\" is a VARIABLE — it stores the name of your quiz!".to_string(),
            format!("  \"title\": {},", json_string(&config.title)),
            String::new(),
            "  // \"pointsPerQuestion\" is a VARIABLE that tracks STATE (your score).".to_string(),
            "  // Every correct answer adds this many points.".to_string(),
            format!("  \"pointsPerQuestion\": {},", js_number(config.points_per_question)),
            String::new(),
            "  // \"questions\" is an ARRAY (a list!) of question objects.".to_string(),
            "  // Each question uses IF/ELSE logic:".to_string(),
            "  //   IF you pick the correct answer → you earn points".to_string(),
            "  //   ELSE → no points, try the next one!".to_string(),
            format!("  \"questions\": {}", pretty_json(&config.questions)),
            "}".to_string(),
        ];
        lines.join("\n")
    }
}

const LINE_ENDS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Remove everything from `//` to the end of its line. Line ends are
/// `\n`, `\r`, U+2028 and U+2029.
///
/// Not string-aware: a `//` inside a quoted value is cut too, so
/// `"a // b"` loses its tail. That is how the dialect is defined.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("//") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let end = after.find(LINE_ENDS).unwrap_or(after.len());
        rest = &after[end..];
    }
    out.push_str(rest);
    out
}

fn json_string(s: &str) -> String {
    // Serializing a plain string cannot fail.
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

fn pretty_json<T: Serialize>(value: &T) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_default(),
        // Questions hold only strings and integers.
        Err(_) => "[]".to_string(),
    }
}

// -------- Transforms --------

/// Append the bank's template question.
pub fn add_question(config: &QuizConfig, bank: &QuizBank) -> QuizConfig {
    let mut questions = config.questions.clone();
    questions.push(bank.template_question.clone());
    QuizConfig { questions, ..config.clone() }
}

/// Raise the points per question and append the trick question.
pub fn make_harder(config: &QuizConfig, bank: &QuizBank) -> QuizConfig {
    let mut questions = config.questions.clone();
    questions.push(bank.trick_question.clone());
    QuizConfig {
        title: config.title.clone(),
        points_per_question: config.points_per_question + bank.points_step as f64,
        questions,
    }
}

/// Retitle the quiz with a random theme other than the current title.
/// With no other theme available the config comes back unchanged.
pub fn change_theme<R: Rng + ?Sized>(config: &QuizConfig, bank: &QuizBank, rng: &mut R) -> QuizConfig {
    let available: Vec<&String> = bank.themes.iter().filter(|t| **t != config.title).collect();
    match available.choose(rng) {
        Some(title) => QuizConfig { title: (*title).clone(), ..config.clone() },
        None => config.clone(),
    }
}
