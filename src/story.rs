//! Story dialect: a fixed-shape generator snippet.
//!
//! The grammar is small:
//!
//! ```text
//! decl     := "const " NAME ws "=" ws "[" items "]"        (items: anything but ']')
//! branch   := "if" ws "(storyType" ws "===" ws Q name Q ")" ws "{" skip TEMPLATE
//! default  := "}" ws "else" ws "{" skip TEMPLATE
//! TEMPLATE := "`" (anything but '`')* "`"
//! ```
//!
//! Each rule is matched at the first position in the text where it succeeds;
//! branches are collected left to right without overlap. Nothing is evaluated.

use winnow::combinator::delimited;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{literal, one_of, take_till, take_while};

use crate::config::StoryBank;
use crate::domain::StoryConfig;
use crate::transcoder::{Dialect, ParseError, Transcoder};

/// Stands for the current character name inside a stored template.
pub const PLACEHOLDER: &str = "{character}";
/// How the snippet writes the character name inside a template literal.
pub const INTERPOLATION: &str = "${character}";

const QUOTES: [char; 2] = ['"', '\''];

#[derive(Clone, Copy, Debug)]
pub struct StoryDialect;

impl Transcoder for StoryDialect {
  type Config = StoryConfig;

  const DIALECT: Dialect = Dialect::Story;

  fn parse(text: &str) -> Result<StoryConfig, ParseError> {
    let characters = parse_list(text, "const CHARACTERS")?;
    let story_types = parse_list(text, "const STORY_TYPES")?;

    let mut config = StoryConfig { characters, story_types, ..Default::default() };

    let mut rest = text;
    while let Some(((genre, body), after)) = find_first(rest, branch) {
      config.templates.insert(genre.to_string(), from_literal(body));
      rest = after;
    }

    // The bare `else` has no genre name; it belongs to the first declared
    // genre still lacking a template.
    if let Some((body, _)) = find_first(text, default_branch) {
      let unmatched = config
        .story_types
        .iter()
        .find(|t| config.template(t).is_none())
        .cloned();
      if let Some(genre) = unmatched {
        config.templates.insert(genre, from_literal(body));
      }
    }

    Ok(config)
  }

  fn serialize(config: &StoryConfig) -> String {
    let char_list = quoted_list(&config.characters);
    let type_list = quoted_list(&config.story_types);

    let last = config.story_types.len().saturating_sub(1);
    let branches: String = config
      .story_types
      .iter()
      .enumerate()
      .map(|(i, genre)| {
        let tmpl = match config.template(genre) {
          Some(t) => to_literal(t),
          None => to_literal(&fallback_template(genre)),
        };
        if i == 0 {
          format!("  if (storyType === \"{genre}\") {{\n    return `{tmpl}`;\n  }}")
        } else if i < last {
          format!(" else if (storyType === \"{genre}\") {{\n    return `{tmpl}`;\n  }}")
        } else {
          format!(" else {{\n    return `{tmpl}`;\n  }}")
        }
      })
      .collect();

    format!(
      r#"// ===== STORY MAKER — Edit this code! =====

// ARRAY: a list of characters to choose from
const CHARACTERS = [{char_list}];

// ARRAY: a list of story genres
const STORY_TYPES = [{type_list}];

// STATE: React remembers which character & genre you picked
const [character, setCharacter] = useState(CHARACTERS[0]);
const [storyType, setStoryType] = useState(STORY_TYPES[0]);

// IF/ELSE + TEMPLATE LITERALS: build a story string
function generateStory(character: string, storyType: string) {{
{branches}
}}

// DERIVED UI: the story updates whenever state changes
const story = generateStory(character, storyType);
"#
    )
  }
}

/// Fill in the story for `character` and `genre`. A genre without a template
/// yields an apology asking for a branch, never an error.
pub fn render(config: &StoryConfig, character: &str, genre: &str) -> String {
  match config.template(genre) {
    Some(t) => t.replace(PLACEHOLDER, character),
    None => format!(
      "{character} is ready for a {genre} story — but no template was found! Add an if/else branch in the code editor."
    ),
  }
}

/// Template emitted for a genre that has none.
pub fn fallback_template(genre: &str) -> String {
  format!("{PLACEHOLDER} goes on a {genre} story!")
}

// -------- Transforms --------

/// Append the first bank character not already in the story, or the bank's
/// fallback name once the bank is used up.
pub fn add_character(config: &StoryConfig, bank: &StoryBank) -> StoryConfig {
  let pick = bank
    .characters
    .iter()
    .find(|c| !config.characters.contains(c))
    .unwrap_or(&bank.fallback_character);
  let mut characters = config.characters.clone();
  characters.push(pick.clone());
  StoryConfig { characters, ..config.clone() }
}

/// Append the first bank genre not already declared, with its template.
/// `None` when every bank genre is present: nothing changes.
pub fn add_genre(config: &StoryConfig, bank: &StoryBank) -> Option<StoryConfig> {
  let pick = bank.genres.iter().find(|g| !config.story_types.contains(&g.name))?;
  let mut next = config.clone();
  next.story_types.push(pick.name.clone());
  next.templates.insert(pick.name.clone(), pick.template.clone());
  Some(next)
}

// -------- Extraction --------

fn parse_list(text: &str, decl: &'static str) -> Result<Vec<String>, ParseError> {
  let (body, _) = find_first(text, array_body(decl))
    .ok_or_else(|| ParseError::new(StoryDialect::DIALECT, format!("missing `{decl} = [...]`")))?;
  let items: Vec<String> = body
    .split(',')
    .map(|s| strip_quotes(s.trim()).to_string())
    .filter(|s| !s.is_empty())
    .collect();
  if items.is_empty() {
    return Err(ParseError::new(StoryDialect::DIALECT, format!("`{decl}` has no entries")));
  }
  Ok(items)
}

/// Run `parser` at every char boundary of `text` and return the first success
/// with the input left after it.
fn find_first<'i, O, P>(text: &'i str, mut parser: P) -> Option<(O, &'i str)>
where
  P: Parser<&'i str, O, ErrMode<ContextError>>,
{
  text.char_indices().find_map(|(start, _)| {
    let mut input = &text[start..];
    parser.parse_next(&mut input).ok().map(|out| (out, input))
  })
}

fn ws<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  take_while(0.., char::is_whitespace).parse_next(input)
}

/// Body of `<decl> = [ ... ]`, brackets excluded.
fn array_body<'i>(decl: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
  move |input: &mut &'i str| -> ModalResult<&'i str> {
    literal(decl).parse_next(input)?;
    ws(input)?;
    '='.parse_next(input)?;
    ws(input)?;
    delimited('[', take_till(1.., ']'), ']').parse_next(input)
  }
}

fn branch<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
  "if".parse_next(input)?;
  ws(input)?;
  '('.parse_next(input)?;
  "storyType".parse_next(input)?;
  ws(input)?;
  "===".parse_next(input)?;
  ws(input)?;
  one_of(QUOTES).parse_next(input)?;
  let genre = take_till(1.., QUOTES).parse_next(input)?;
  one_of(QUOTES).parse_next(input)?;
  ')'.parse_next(input)?;
  ws(input)?;
  '{'.parse_next(input)?;
  let body = template_literal(input)?;
  Ok((genre, body))
}

fn default_branch<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  '}'.parse_next(input)?;
  ws(input)?;
  "else".parse_next(input)?;
  ws(input)?;
  '{'.parse_next(input)?;
  template_literal(input)
}

/// Skip to the next backtick and take the template literal starting there.
fn template_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
  take_till(0.., '`').parse_next(input)?;
  delimited('`', take_till(0.., '`'), '`').parse_next(input)
}

/// Drop one leading and one trailing quote character, independently.
fn strip_quotes(s: &str) -> &str {
  let s = s.strip_prefix(QUOTES).unwrap_or(s);
  s.strip_suffix(QUOTES).unwrap_or(s)
}

fn quoted_list(items: &[String]) -> String {
  items.iter().map(|i| format!("\"{i}\"")).collect::<Vec<_>>().join(", ")
}

fn from_literal(body: &str) -> String {
  body.replace(INTERPOLATION, PLACEHOLDER)
}

fn to_literal(template: &str) -> String {
  template.replace(PLACEHOLDER, INTERPOLATION)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::DEFAULT_STORY_TEXT;
  use std::collections::BTreeMap;

  fn snippet(characters: &str, types: &str, body: &str) -> String {
    format!(
      "const CHARACTERS = [{characters}];\nconst STORY_TYPES = [{types}];\nfunction generateStory(character, storyType) {{\n{body}\n}}\n"
    )
  }

  fn config(characters: &[&str], genres: &[(&str, &str)]) -> StoryConfig {
    StoryConfig {
      characters: characters.iter().map(|s| s.to_string()).collect(),
      story_types: genres.iter().map(|(g, _)| g.to_string()).collect(),
      templates: genres.iter().map(|(g, t)| (g.to_string(), t.to_string())).collect(),
    }
  }

  #[test]
  fn parses_default_snippet() {
    let cfg = StoryDialect::parse(DEFAULT_STORY_TEXT).unwrap();
    assert_eq!(cfg.characters, vec!["Wizard", "Astronaut", "Detective"]);
    assert_eq!(cfg.story_types, vec!["Adventure", "Mystery", "Funny"]);
    assert_eq!(cfg.templates.len(), 3);
    assert!(cfg.templates["Adventure"].starts_with("{character} set off on a wild adventure"));
    assert!(cfg.templates["Funny"].contains("mismatched shoes"));
    assert!(!cfg.templates["Mystery"].contains("${"));
  }

  #[test]
  fn default_snippet_is_canonical() {
    let cfg = StoryDialect::parse(DEFAULT_STORY_TEXT).unwrap();
    assert_eq!(StoryDialect::serialize(&cfg), DEFAULT_STORY_TEXT);
  }

  #[test]
  fn list_entries_are_trimmed_unquoted_and_filtered() {
    let text = snippet("  'Wizard' , \"Ninja\",, Chef ,", "\"A\"", "");
    let cfg = StoryDialect::parse(&text).unwrap();
    assert_eq!(cfg.characters, vec!["Wizard", "Ninja", "Chef"]);
    assert_eq!(cfg.story_types, vec!["A"]);
    assert!(cfg.templates.is_empty());
  }

  #[test]
  fn lists_may_span_lines() {
    let text = snippet("\n  \"Wizard\",\n  \"Ninja\"\n", "\"A\", \"B\"", "");
    assert_eq!(StoryDialect::parse(&text).unwrap().characters, vec!["Wizard", "Ninja"]);
  }

  #[test]
  fn missing_or_empty_lists_fail() {
    let no_chars = "const STORY_TYPES = [\"A\"];";
    let empty_chars = snippet("", "\"A\"", "");
    let blank_chars = snippet(" , \"\" ", "\"A\"", "");
    let no_types = "const CHARACTERS = [\"W\"];";
    for text in [no_chars.to_string(), empty_chars, blank_chars, no_types.to_string()] {
      let err = StoryDialect::parse(&text).unwrap_err();
      assert_eq!(err.dialect, Dialect::Story);
      assert_eq!(err.to_string(), Dialect::Story.hint());
    }
  }

  #[test]
  fn else_binds_to_first_genre_without_template() {
    let body = r#"  if (storyType === "Adventure") {
    return `${character} A`;
  } else if (storyType === "Mystery") {
    return `${character} M`;
  } else {
    return `${character} F`;
  }"#;
    let text = snippet("\"W\"", "\"Adventure\", \"Mystery\", \"Funny\"", body);
    let cfg = StoryDialect::parse(&text).unwrap();
    assert_eq!(cfg.templates["Funny"], "{character} F");

    // With two genres uncovered, the earlier one takes the else body.
    let text = snippet("\"W\"", "\"Adventure\", \"Space\", \"Mystery\", \"Funny\"", body);
    let cfg = StoryDialect::parse(&text).unwrap();
    assert_eq!(cfg.templates["Space"], "{character} F");
    assert!(!cfg.templates.contains_key("Funny"));
  }

  #[test]
  fn branch_accepts_single_quotes_and_loose_spacing() {
    let body = "if(storyType==='Odd'){ return `x ${character}`; }";
    let cfg = StoryDialect::parse(&snippet("\"W\"", "\"Odd\"", body)).unwrap();
    assert_eq!(cfg.templates["Odd"], "x {character}");
  }

  #[test]
  fn later_branch_for_same_genre_wins() {
    let body = "if (storyType === \"A\") { return `one`; } else if (storyType === \"A\") { return `two`; }";
    let cfg = StoryDialect::parse(&snippet("\"W\"", "\"A\"", body)).unwrap();
    assert_eq!(cfg.templates["A"], "two");
  }

  #[test]
  fn branch_names_outside_story_types_are_kept() {
    let body = "if (storyType === \"Ghost\") { return `boo`; }";
    let cfg = StoryDialect::parse(&snippet("\"W\"", "\"A\"", body)).unwrap();
    assert_eq!(cfg.templates["Ghost"], "boo");
    assert_eq!(cfg.template("A"), None);
  }

  #[test]
  fn parse_is_deterministic() {
    let a = StoryDialect::parse(DEFAULT_STORY_TEXT);
    let b = StoryDialect::parse(DEFAULT_STORY_TEXT);
    assert_eq!(a, b);
  }

  #[test]
  fn round_trip_keeps_lists_and_templates() {
    let cfg = config(
      &["Pirate", "Chef"],
      &[("Scary", "{character} hid."), ("Space", "Up went {character}!"), ("Silly", "{character} {character}")],
    );
    let text = StoryDialect::serialize(&cfg);
    let parsed = StoryDialect::parse(&text).unwrap();
    assert_eq!(parsed, cfg);
    assert_eq!(StoryDialect::serialize(&parsed), text);
  }

  #[test]
  fn single_and_double_genre_layouts_round_trip() {
    let one = config(&["W"], &[("Only", "{character} alone")]);
    let text = StoryDialect::serialize(&one);
    assert!(text.contains("  if (storyType === \"Only\") {\n    return `${character} alone`;\n  }\n}"));
    assert!(!text.contains("else"));
    assert_eq!(StoryDialect::parse(&text).unwrap(), one);

    let two = config(&["W"], &[("A", "a"), ("B", "b")]);
    let text = StoryDialect::serialize(&two);
    assert!(text.contains("  } else {\n    return `b`;\n  }"));
    assert!(!text.contains("else if"));
    assert_eq!(StoryDialect::parse(&text).unwrap(), two);
  }

  #[test]
  fn missing_templates_are_synthesized() {
    let cfg = StoryConfig {
      characters: vec!["W".into()],
      story_types: vec!["A".into(), "B".into()],
      templates: BTreeMap::from([("B".to_string(), String::new())]),
    };
    let text = StoryDialect::serialize(&cfg);
    assert!(text.contains("return `${character} goes on a A story!`;"));
    assert!(text.contains("return `${character} goes on a B story!`;"));

    let parsed = StoryDialect::parse(&text).unwrap();
    assert_eq!(parsed.template("A"), Some("{character} goes on a A story!"));
    assert_eq!(parsed.template("B"), Some("{character} goes on a B story!"));
  }

  #[test]
  fn reserialization_is_idempotent() {
    let messy = snippet(
      "'Wizard',Robot",
      "\"A\",\"B\",\"C\"",
      "if (storyType === \"B\") { return `b ${character}`; } else { return `rest`; }",
    );
    let once = StoryDialect::serialize(&StoryDialect::parse(&messy).unwrap());
    let twice = StoryDialect::serialize(&StoryDialect::parse(&once).unwrap());
    assert_eq!(once, twice);
  }

  #[test]
  fn render_substitutes_every_placeholder() {
    let cfg = config(&["W"], &[("A", "{character} met {character}.")]);
    assert_eq!(render(&cfg, "Ninja", "A"), "Ninja met Ninja.");
  }

  #[test]
  fn render_substitution_is_single_pass() {
    let cfg = config(&["W"], &[("A", "Hi {character}!")]);
    assert_eq!(render(&cfg, "{character}", "A"), "Hi {character}!");
    assert_eq!(render(&cfg, "${character}", "A"), "Hi ${character}!");
  }

  #[test]
  fn render_without_template_apologizes() {
    let cfg = config(&["W"], &[("A", "")]);
    let text = render(&cfg, "Robot", "A");
    assert!(text.starts_with("Robot is ready for a A story"));
    assert!(text.ends_with("Add an if/else branch in the code editor."));
    assert!(render(&cfg, "Robot", "Zzz").contains("Zzz story"));
  }

  #[test]
  fn add_character_walks_the_bank_then_falls_back() {
    let bank = StoryBank::default();
    let mut cfg = config(&["Robot"], &[("A", "a")]);
    let before = cfg.clone();
    let next = add_character(&cfg, &bank);
    assert_eq!(cfg, before);
    assert_eq!(next.characters, vec!["Robot", "Pirate"]);

    for _ in 0..5 {
      cfg = add_character(&cfg, &bank);
    }
    assert_eq!(cfg.characters.len(), 6);
    cfg = add_character(&cfg, &bank);
    cfg = add_character(&cfg, &bank);
    assert_eq!(&cfg.characters[6..], ["Hero", "Hero"]);
  }

  #[test]
  fn add_genre_appends_with_template() {
    let bank = StoryBank::default();
    let cfg = config(&["W"], &[("Scary", "mine")]);
    let next = add_genre(&cfg, &bank).unwrap();
    assert_eq!(next.story_types, vec!["Scary", "Sci-Fi"]);
    assert_eq!(next.templates["Scary"], "mine");
    assert!(next.templates["Sci-Fi"].starts_with("{character} boarded a rocket ship"));
  }

  #[test]
  fn add_genre_is_noop_when_bank_exhausted() {
    let bank = StoryBank::default();
    let cfg = config(&["W"], &[("Scary", "s"), ("Sci-Fi", "f"), ("Fairytale", "t")]);
    let before = cfg.clone();
    assert_eq!(add_genre(&cfg, &bank), None);
    assert_eq!(cfg, before);
  }

  #[test]
  fn added_genre_becomes_else_branch_and_survives_reparse() {
    let bank = StoryBank::default();
    let cfg = StoryDialect::parse(DEFAULT_STORY_TEXT).unwrap();
    let next = add_genre(&cfg, &bank).unwrap();
    let text = StoryDialect::serialize(&next);
    assert!(text.contains("} else if (storyType === \"Funny\") {"));
    assert!(text.contains("} else {\n    return `${character} crept through"));
    assert_eq!(StoryDialect::parse(&text).unwrap(), next);
  }
}
