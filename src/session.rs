//! Lesson sessions: the editor text, the live config, chat history, and the
//! per-lesson preview state (quiz play or story selection).
//!
//! Two kinds of events reach a session. An editor change parses the text and
//! replaces the config only on success. An agent action transforms the config,
//! re-renders the text from it, and opens the editor. Both replace the config
//! as a whole value; nothing edits it in place.

use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::chat::{self, MessageLog};
use crate::config::{LessonConfig, QuizBank, StoryBank};
use crate::domain::{LessonKind, QuizConfig, StoryConfig};
use crate::error::LessonError;
use crate::play::{Feedback, QuizPlay, QuizView};
use crate::quiz::{self, QuizDialect};
use crate::seeds::{DEFAULT_QUIZ_TEXT, DEFAULT_STORY_TEXT};
use crate::story::{self, StoryDialect};
use crate::transcoder::{ParseError, Transcoder};

/// Result of feeding editor text to the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    /// Text parsed; the config was replaced.
    Applied,
    /// Text did not parse; the previous config is still live.
    Rejected,
}

/// Editor text kept in step with a config of dialect `T`.
///
/// The text may run ahead of the config while the user is typing something
/// that does not parse yet; `version` counts config replacements.
#[derive(Clone, Debug)]
pub struct Editor<T: Transcoder> {
    text: String,
    config: T::Config,
    error: Option<String>,
    version: u64,
    open: bool,
}

impl<T: Transcoder> Editor<T> {
    pub fn new(text: &str) -> Result<Self, ParseError> {
        let config = T::parse(text)?;
        Ok(Self { text: text.to_string(), config, error: None, version: 1, open: false })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &T::Config {
        &self.config
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Keep `text` as typed. Replace the config only if it parses.
    pub fn edit(&mut self, text: String) -> EditOutcome {
        let parsed = T::parse(&text);
        self.text = text;
        match parsed {
            Ok(config) => {
                self.config = config;
                self.error = None;
                self.version += 1;
                EditOutcome::Applied
            }
            Err(e) => {
                self.error = Some(e.to_string());
                EditOutcome::Rejected
            }
        }
    }

    /// Run an agent transform: the result becomes the config, the text is
    /// re-rendered from it, any parse error is cleared, and the editor opens.
    /// A `None` result keeps the config (and version) but still re-renders.
    /// Returns whether the config changed.
    pub fn apply<F>(&mut self, transform: F) -> bool
    where
        F: FnOnce(&T::Config) -> Option<T::Config>,
    {
        let changed = match transform(&self.config) {
            Some(next) => {
                self.config = next;
                self.version += 1;
                true
            }
            None => false,
        };
        self.text = T::serialize(&self.config);
        self.error = None;
        self.open = true;
        changed
    }
}

// -------- Actions --------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizAction {
    AddQuestion,
    MakeHarder,
    ChangeTheme,
}

impl QuizAction {
    pub const ALL: [QuizAction; 3] = [QuizAction::AddQuestion, QuizAction::MakeHarder, QuizAction::ChangeTheme];

    pub fn id(self) -> &'static str {
        match self {
            QuizAction::AddQuestion => "add_question",
            QuizAction::MakeHarder => "make_harder",
            QuizAction::ChangeTheme => "change_theme",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuizAction::AddQuestion => "Add a question",
            QuizAction::MakeHarder => "Make it harder",
            QuizAction::ChangeTheme => "Change theme",
        }
    }
}

impl FromStr for QuizAction {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuizAction::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| LessonError::UnknownAction { lesson: LessonKind::Quiz, action: s.to_string() })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryAction {
    AddCharacter,
    AddGenre,
    /// Changes the selection only, never the config.
    Randomize,
}

impl StoryAction {
    pub const ALL: [StoryAction; 3] = [StoryAction::AddCharacter, StoryAction::AddGenre, StoryAction::Randomize];

    pub fn id(self) -> &'static str {
        match self {
            StoryAction::AddCharacter => "add_character",
            StoryAction::AddGenre => "add_genre",
            StoryAction::Randomize => "randomize",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StoryAction::AddCharacter => "Add a character",
            StoryAction::AddGenre => "Add a genre",
            StoryAction::Randomize => "Randomize",
        }
    }
}

impl FromStr for StoryAction {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoryAction::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| LessonError::UnknownAction { lesson: LessonKind::Story, action: s.to_string() })
    }
}

// -------- Quiz lesson --------

#[derive(Clone, Debug)]
pub struct QuizLesson {
    editor: Editor<QuizDialect>,
    chat: MessageLog,
    play: QuizPlay,
}

impl QuizLesson {
    pub fn new() -> Result<Self, ParseError> {
        let editor = Editor::<QuizDialect>::new(DEFAULT_QUIZ_TEXT)?;
        let play = QuizPlay::new(editor.version());
        let mut chat = MessageLog::new();
        chat.buddy(chat::greeting(LessonKind::Quiz));
        Ok(Self { editor, chat, play })
    }

    pub fn editor(&self) -> &Editor<QuizDialect> {
        &self.editor
    }

    pub fn config(&self) -> &QuizConfig {
        self.editor.config()
    }

    pub fn chat(&self) -> &MessageLog {
        &self.chat
    }

    pub fn edit(&mut self, text: String) -> EditOutcome {
        let outcome = self.editor.edit(text);
        self.play.sync(self.editor.version());
        outcome
    }

    pub fn act<R: Rng + ?Sized>(&mut self, action: QuizAction, bank: &QuizBank, rng: &mut R) {
        let (kid, reply) = match action {
            QuizAction::AddQuestion => {
                self.editor.apply(|c| Some(quiz::add_question(c, bank)));
                (chat::ADD_QUESTION_KID, chat::ADD_QUESTION_REPLY)
            }
            QuizAction::MakeHarder => {
                self.editor.apply(|c| Some(quiz::make_harder(c, bank)));
                (chat::MAKE_HARDER_KID, chat::MAKE_HARDER_REPLY)
            }
            QuizAction::ChangeTheme => {
                self.editor.apply(|c| Some(quiz::change_theme(c, bank, rng)));
                (chat::CHANGE_THEME_KID, chat::CHANGE_THEME_REPLY)
            }
        };
        self.chat.exchange(kid, reply);
        self.play.sync(self.editor.version());
    }

    pub fn view(&self) -> QuizView {
        self.play.view(self.editor.config())
    }

    pub fn score(&self) -> f64 {
        self.play.score()
    }

    pub fn answer(&mut self, choice: usize) -> Result<Feedback, LessonError> {
        Ok(self.play.answer(self.editor.config(), choice)?)
    }

    pub fn next(&mut self) -> Result<(), LessonError> {
        Ok(self.play.next(self.editor.config())?)
    }

    pub fn restart(&mut self) {
        self.play.restart();
    }
}

// -------- Story lesson --------

/// Which character and genre the story preview shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub character: String,
    pub genre: String,
}

#[derive(Clone, Debug)]
pub struct StoryLesson {
    editor: Editor<StoryDialect>,
    chat: MessageLog,
    selection: Selection,
}

impl StoryLesson {
    pub fn new() -> Result<Self, ParseError> {
        let editor = Editor::<StoryDialect>::new(DEFAULT_STORY_TEXT)?;
        let config = editor.config();
        let selection = Selection {
            character: config.characters.first().cloned().unwrap_or_default(),
            genre: config.story_types.first().cloned().unwrap_or_default(),
        };
        let mut chat = MessageLog::new();
        chat.buddy(chat::greeting(LessonKind::Story));
        Ok(Self { editor, chat, selection })
    }

    pub fn editor(&self) -> &Editor<StoryDialect> {
        &self.editor
    }

    pub fn config(&self) -> &StoryConfig {
        self.editor.config()
    }

    pub fn chat(&self) -> &MessageLog {
        &self.chat
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// After a successful parse, a selection that no longer exists falls back
    /// to the first entry.
    pub fn edit(&mut self, text: String) -> EditOutcome {
        let outcome = self.editor.edit(text);
        if outcome == EditOutcome::Applied {
            let config = self.editor.config();
            if !config.characters.contains(&self.selection.character) {
                if let Some(first) = config.characters.first() {
                    self.selection.character = first.clone();
                }
            }
            if !config.story_types.contains(&self.selection.genre) {
                if let Some(first) = config.story_types.first() {
                    self.selection.genre = first.clone();
                }
            }
        }
        outcome
    }

    pub fn act<R: Rng + ?Sized>(&mut self, action: StoryAction, bank: &StoryBank, rng: &mut R) {
        match action {
            StoryAction::AddCharacter => {
                self.editor.apply(|c| Some(story::add_character(c, bank)));
                self.chat.exchange(chat::ADD_CHARACTER_KID, chat::ADD_CHARACTER_REPLY);
            }
            StoryAction::AddGenre => {
                let added = self.editor.apply(|c| story::add_genre(c, bank));
                let reply = if added { chat::ADD_GENRE_REPLY } else { chat::ADD_GENRE_EXHAUSTED_REPLY };
                self.chat.exchange(chat::ADD_GENRE_KID, reply);
            }
            StoryAction::Randomize => {
                let config = self.editor.config();
                if let Some(character) = config.characters.choose(rng) {
                    self.selection.character = character.clone();
                }
                if let Some(genre) = config.story_types.choose(rng) {
                    self.selection.genre = genre.clone();
                }
                let reply = chat::randomize_reply(&self.selection.character, &self.selection.genre);
                self.chat.exchange(chat::RANDOMIZE_KID, reply);
            }
        }
    }

    /// Change the selection; each given value must be declared in the story.
    pub fn select(&mut self, character: Option<String>, genre: Option<String>) -> Result<(), LessonError> {
        let config = self.editor.config();
        if let Some(c) = &character {
            if !config.characters.contains(c) {
                return Err(LessonError::UnknownSelection(c.clone()));
            }
        }
        if let Some(g) = &genre {
            if !config.story_types.contains(g) {
                return Err(LessonError::UnknownSelection(g.clone()));
            }
        }
        if let Some(c) = character {
            self.selection.character = c;
        }
        if let Some(g) = genre {
            self.selection.genre = g;
        }
        Ok(())
    }

    /// The story for the current selection.
    pub fn story(&self) -> String {
        story::render(self.editor.config(), &self.selection.character, &self.selection.genre)
    }
}

// -------- Either lesson --------

#[derive(Clone, Debug)]
pub enum Lesson {
    Quiz(QuizLesson),
    Story(StoryLesson),
}

impl Lesson {
    pub fn start(kind: LessonKind) -> Result<Self, LessonError> {
        Ok(match kind {
            LessonKind::Quiz => Lesson::Quiz(QuizLesson::new()?),
            LessonKind::Story => Lesson::Story(StoryLesson::new()?),
        })
    }

    pub fn kind(&self) -> LessonKind {
        match self {
            Lesson::Quiz(_) => LessonKind::Quiz,
            Lesson::Story(_) => LessonKind::Story,
        }
    }

    pub fn version(&self) -> u64 {
        match self {
            Lesson::Quiz(q) => q.editor().version(),
            Lesson::Story(s) => s.editor().version(),
        }
    }

    pub fn edit(&mut self, text: String) -> EditOutcome {
        match self {
            Lesson::Quiz(q) => q.edit(text),
            Lesson::Story(s) => s.edit(text),
        }
    }

    pub fn toggle_editor(&mut self) {
        match self {
            Lesson::Quiz(q) => q.editor.toggle(),
            Lesson::Story(s) => s.editor.toggle(),
        }
    }

    /// Dispatch an action identifier from the chat panel.
    pub fn act<R: Rng + ?Sized>(&mut self, action: &str, banks: &LessonConfig, rng: &mut R) -> Result<(), LessonError> {
        match self {
            Lesson::Quiz(q) => q.act(action.parse()?, &banks.quiz, rng),
            Lesson::Story(s) => s.act(action.parse()?, &banks.story, rng),
        }
        Ok(())
    }

    /// Free text typed into the chat. Blank input is ignored.
    pub fn send(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let log = match self {
            Lesson::Quiz(q) => &mut q.chat,
            Lesson::Story(s) => &mut s.chat,
        };
        log.exchange(text, chat::FREE_TEXT_REPLY);
    }

    pub fn as_quiz_mut(&mut self) -> Result<&mut QuizLesson, LessonError> {
        match self {
            Lesson::Quiz(q) => Ok(q),
            Lesson::Story(_) => Err(LessonError::WrongLesson { expected: LessonKind::Quiz }),
        }
    }

    pub fn as_story_mut(&mut self) -> Result<&mut StoryLesson, LessonError> {
        match self {
            Lesson::Story(s) => Ok(s),
            Lesson::Quiz(_) => Err(LessonError::WrongLesson { expected: LessonKind::Story }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;
    use crate::transcoder::Dialect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn failed_edit_keeps_config_and_text() {
        let mut lesson = QuizLesson::new().unwrap();
        let before = lesson.config().clone();
        let version = lesson.editor().version();

        assert_eq!(lesson.edit("{ \"title\": ".into()), EditOutcome::Rejected);
        assert_eq!(lesson.config(), &before);
        assert_eq!(lesson.editor().version(), version);
        assert_eq!(lesson.editor().text(), "{ \"title\": ");
        assert_eq!(lesson.editor().error(), Some(Dialect::Quiz.hint()));
    }

    #[test]
    fn successful_edit_replaces_config_and_clears_error() {
        let mut lesson = QuizLesson::new().unwrap();
        lesson.edit("nope".into());
        let outcome = lesson.edit(r#"{"title":"T","pointsPerQuestion":10,"questions":[]}"#.into());
        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(lesson.config().title, "T");
        assert_eq!(lesson.editor().error(), None);
        assert_eq!(lesson.editor().version(), 2);
        assert!(matches!(lesson.view(), QuizView::NoQuestions { .. }));
    }

    #[test]
    fn action_rerenders_text_and_opens_editor() {
        let mut lesson = QuizLesson::new().unwrap();
        lesson.edit("{ broken".into());
        assert!(!lesson.editor().is_open());

        lesson.act(QuizAction::AddQuestion, &QuizBank::default(), &mut rng());
        let editor = lesson.editor();
        assert!(editor.is_open());
        assert_eq!(editor.error(), None);
        assert_eq!(editor.text(), QuizDialect::serialize(editor.config()));
        assert_eq!(editor.config().questions.len(), 4);
        assert_eq!(QuizDialect::parse(editor.text()).unwrap(), *editor.config());

        let last = &lesson.chat().messages()[lesson.chat().messages().len() - 2..];
        assert_eq!(last[0].sender, Sender::Kid);
        assert_eq!(last[0].text, chat::ADD_QUESTION_KID);
        assert_eq!(last[1].text, chat::ADD_QUESTION_REPLY);
    }

    #[test]
    fn action_resets_play() {
        let mut lesson = QuizLesson::new().unwrap();
        lesson.answer(1).unwrap();
        lesson.act(QuizAction::MakeHarder, &QuizBank::default(), &mut rng());
        match lesson.view() {
            QuizView::Question { number, score, answered, .. } => {
                assert_eq!((number, score, answered), (1, 0.0, None));
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert_eq!(lesson.config().points_per_question, 15.0);
    }

    #[test]
    fn action_ids_parse_per_lesson() {
        assert_eq!("make_harder".parse::<QuizAction>().unwrap(), QuizAction::MakeHarder);
        assert_eq!("randomize".parse::<StoryAction>().unwrap(), StoryAction::Randomize);
        assert!(matches!(
            "add_genre".parse::<QuizAction>(),
            Err(LessonError::UnknownAction { lesson: LessonKind::Quiz, .. })
        ));
    }

    #[test]
    fn story_edit_resets_missing_selection() {
        let mut lesson = StoryLesson::new().unwrap();
        lesson.select(Some("Detective".into()), Some("Funny".into())).unwrap();

        let text = lesson.editor().text().replace("\"Detective\"", "\"Spy\"").replace("\"Funny\"", "\"Silly\"");
        assert_eq!(lesson.edit(text), EditOutcome::Applied);
        assert_eq!(lesson.selection(), &Selection { character: "Wizard".into(), genre: "Adventure".into() });
    }

    #[test]
    fn story_select_validates_membership() {
        let mut lesson = StoryLesson::new().unwrap();
        assert!(matches!(
            lesson.select(Some("Nobody".into()), None),
            Err(LessonError::UnknownSelection(name)) if name == "Nobody"
        ));
        lesson.select(None, Some("Mystery".into())).unwrap();
        assert!(lesson.story().starts_with("Wizard noticed the town clock"));
    }

    #[test]
    fn add_genre_exhausted_keeps_version_but_rerenders() {
        let mut lesson = StoryLesson::new().unwrap();
        let bank = StoryBank::default();
        for _ in 0..3 {
            lesson.act(StoryAction::AddGenre, &bank, &mut rng());
        }
        let version = lesson.editor().version();
        let config = lesson.config().clone();
        lesson.edit("garbage".into());

        lesson.act(StoryAction::AddGenre, &bank, &mut rng());
        assert_eq!(lesson.editor().version(), version);
        assert_eq!(lesson.config(), &config);
        assert_eq!(lesson.editor().error(), None);
        assert_eq!(lesson.editor().text(), StoryDialect::serialize(&config));
        let last = lesson.chat().messages().last().unwrap();
        assert_eq!(last.text, chat::ADD_GENRE_EXHAUSTED_REPLY);
    }

    #[test]
    fn randomize_changes_selection_not_config() {
        let mut lesson = StoryLesson::new().unwrap();
        let config = lesson.config().clone();
        let version = lesson.editor().version();
        lesson.act(StoryAction::Randomize, &StoryBank::default(), &mut rng());
        assert_eq!(lesson.config(), &config);
        assert_eq!(lesson.editor().version(), version);
        let sel = lesson.selection().clone();
        assert!(config.characters.contains(&sel.character));
        assert!(config.story_types.contains(&sel.genre));
        let last = lesson.chat().messages().last().unwrap();
        assert!(last.text.contains(&format!("{} + {}", sel.character, sel.genre)));
    }

    #[test]
    fn lesson_dispatch_and_chat() {
        let banks = LessonConfig::default();
        let mut lesson = Lesson::start(LessonKind::Story).unwrap();
        assert!(lesson.act("add_question", &banks, &mut rng()).is_err());
        lesson.act("add_character", &banks, &mut rng()).unwrap();
        assert!(lesson.as_quiz_mut().is_err());
        assert_eq!(lesson.as_story_mut().unwrap().config().characters.last().unwrap(), "Pirate");

        lesson.send("   ");
        lesson.send(" why? ");
        let log = lesson.as_story_mut().unwrap().chat().messages().to_vec();
        assert_eq!(log[log.len() - 2].text, "why?");
        assert_eq!(log[log.len() - 1].text, chat::FREE_TEXT_REPLY);
        // greeting + add_character exchange + free text exchange
        assert_eq!(log.len(), 5);
        assert_eq!(log.last().unwrap().id, 5);
    }
}
