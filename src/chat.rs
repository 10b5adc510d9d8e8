//! Chat messages between the kid and BuildBuddy, plus the buddy's canned replies.

use serde::Serialize;

use crate::domain::LessonKind;
use crate::util::fill_template;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
  Kid,
  Buddy,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
  pub id: u64,
  pub sender: Sender,
  pub text: String,
}

/// Message history of one session. Ids start at 1 and only ever grow;
/// every session has its own counter.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
  last_id: u64,
  messages: Vec<ChatMessage>,
}

impl MessageLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn kid(&mut self, text: impl Into<String>) -> &ChatMessage {
    self.push(Sender::Kid, text.into())
  }

  pub fn buddy(&mut self, text: impl Into<String>) -> &ChatMessage {
    self.push(Sender::Buddy, text.into())
  }

  /// Kid line followed by the buddy's answer.
  pub fn exchange(&mut self, kid: impl Into<String>, buddy: impl Into<String>) {
    self.kid(kid);
    self.buddy(buddy);
  }

  pub fn messages(&self) -> &[ChatMessage] {
    &self.messages
  }

  fn push(&mut self, sender: Sender, text: String) -> &ChatMessage {
    self.last_id += 1;
    self.messages.push(ChatMessage { id: self.last_id, sender, text });
    &self.messages[self.messages.len() - 1]
  }
}

pub fn greeting(lesson: LessonKind) -> &'static str {
  match lesson {
    LessonKind::Quiz => "Hi! I'm BuildBuddy. Try the buttons below to build your quiz!",
    LessonKind::Story => "Hi! I'm BuildBuddy. Pick a character and story type, or use my buttons to add new ones!",
  }
}

/// Reply to anything typed into the chat box.
pub const FREE_TEXT_REPLY: &str =
  "Great question! Try clicking one of my action buttons below to see me write code for you.";

pub const ADD_QUESTION_KID: &str = "Add a question!";
pub const ADD_QUESTION_REPLY: &str = "Done! I added a new question to your ARRAY (list). An array holds multiple items — here it's your list of questions. Check the code to see the new entry!";

pub const MAKE_HARDER_KID: &str = "Make it harder!";
pub const MAKE_HARDER_REPLY: &str = "I bumped up pointsPerQuestion (that's a VARIABLE tracking your score STATE) and added a tricky question. The quiz uses IF/ELSE: IF correct -> add points, ELSE -> no points!";

pub const CHANGE_THEME_KID: &str = "Change the theme!";
pub const CHANGE_THEME_REPLY: &str = "New theme applied! I changed the title VARIABLE. Variables are like labeled boxes — you can swap what's inside anytime!";

pub const ADD_CHARACTER_KID: &str = "Add a character!";
pub const ADD_CHARACTER_REPLY: &str = "Done! I added a new string to the CHARACTERS array. Look at the code — arrays use square brackets [] and commas to hold a list of values!";

pub const ADD_GENRE_KID: &str = "Add a genre!";
pub const ADD_GENRE_REPLY: &str = "New genre added! I updated STORY_TYPES and wrote a new if/else branch with a template literal. The `${character}` placeholder gets replaced with the real character name!";
pub const ADD_GENRE_EXHAUSTED_REPLY: &str = "Your story already has every genre I know! Try writing your own if/else branch in the code editor.";

pub const RANDOMIZE_KID: &str = "Randomize!";
const RANDOMIZE_REPLY_TPL: &str = "Random pick: {character} + {genre}! I called setCharacter() and setStoryType() — updating STATE re-renders the story automatically. That's derived UI!";

pub fn randomize_reply(character: &str, genre: &str) -> String {
  fill_template(RANDOMIZE_REPLY_TPL, &[("character", character), ("genre", genre)])
}
