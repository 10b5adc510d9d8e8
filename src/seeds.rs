//! Seed data: the editor documents a session starts from and the built-in
//! content banks the agent actions draw new items from.

use crate::domain::Question;

/// Quiz editor document shown when a quiz lesson starts.
pub const DEFAULT_QUIZ_TEXT: &str = r#"{
  // --- Code Editor ---
  // "title" is a VARIABLE — it stores the name of your quiz!
  "title": "Animal Quiz 🐾",

  // "pointsPerQuestion" is a VARIABLE that tracks STATE (your score).
  // Every correct answer adds this many points.
  "pointsPerQuestion": 10,

  // "questions" is an ARRAY (a list!) of question objects.
  // Each question uses IF/ELSE logic:
  //   IF you pick the correct answer → you earn points
  //   ELSE → no points, try the next one!
  "questions": [
    {
      "prompt": "What sound does a cat make?",
      "choices": ["Woof", "Meow", "Moo", "Quack"],
      "correctIndex": 1
    },
    {
      "prompt": "How many legs does a spider have?",
      "choices": ["6", "8", "10", "4"],
      "correctIndex": 1
    },
    {
      "prompt": "Which animal is the tallest?",
      "choices": ["Elephant", "Giraffe", "Bear", "Horse"],
      "correctIndex": 1
    }
  ]
}"#;

/// Story generator snippet shown when a story lesson starts.
/// It is already in canonical form: serializing its parse reproduces it.
pub const DEFAULT_STORY_TEXT: &str = r#"// ===== STORY MAKER — Edit this code! =====

// ARRAY: a list of characters to choose from
const CHARACTERS = ["Wizard", "Astronaut", "Detective"];

// ARRAY: a list of story genres
const STORY_TYPES = ["Adventure", "Mystery", "Funny"];

// STATE: React remembers which character & genre you picked
const [character, setCharacter] = useState(CHARACTERS[0]);
const [storyType, setStoryType] = useState(STORY_TYPES[0]);

// IF/ELSE + TEMPLATE LITERALS: build a story string
function generateStory(character: string, storyType: string) {
  if (storyType === "Adventure") {
    return `${character} set off on a wild adventure through the Enchanted Forest. ${character} found a glowing map inside a hollow tree. Following it, ${character} discovered a mountain made of crystals!`;
  } else if (storyType === "Mystery") {
    return `${character} noticed the town clock had stopped at midnight. ${character} found a golden key under the clock tower steps. It opened a secret room full of old journals!`;
  } else {
    return `${character} accidentally wore mismatched shoes to the Grand Gala. ${character} started a silly dance that made everyone laugh. Mismatched shoes became the hottest trend!`;
  }
}

// DERIVED UI: the story updates whenever state changes
const story = generateStory(character, storyType);
"#;

/// Points added by each "make harder" action.
pub const HARDER_POINTS_STEP: i64 = 5;

/// Character used once every bank character is already in the story.
pub const FALLBACK_CHARACTER: &str = "Hero";

/// Appended by "add question".
pub fn template_question() -> Question {
  Question::new("What color is the sky?", &["Green", "Blue", "Red", "Yellow"], 1)
}

/// Appended by "make harder".
pub fn trick_question() -> Question {
  Question::new(
    "Which of these is NOT a real animal?",
    &["Axolotl", "Quokka", "Snipe", "Grumblepuff"],
    3,
  )
}

/// Titles "change theme" picks from.
pub fn seed_themes() -> Vec<String> {
  [
    "Space Explorer Quiz 🚀",
    "Ocean Adventure Quiz 🐙",
    "Dino Discovery Quiz 🦕",
    "Robot Lab Quiz 🤖",
  ]
  .iter()
  .map(|s| s.to_string())
  .collect()
}

/// Characters "add character" offers, in order.
pub fn seed_characters() -> Vec<String> {
  ["Pirate", "Robot", "Dragon", "Ninja", "Chef", "Alien"]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Genres "add genre" offers, in order, with their templates.
pub fn seed_genres() -> Vec<(String, String)> {
  vec![
    (
      "Scary".into(),
      "{character} crept through a dark, creaky old mansion. Every shadow seemed to move. Then {character} heard footsteps behind them... but it was just a friendly cat! {character} laughed with relief.".into(),
    ),
    (
      "Sci-Fi".into(),
      "{character} boarded a rocket ship headed for Planet Zorp. The aliens spoke in colors instead of words. {character} learned to say hello by turning bright purple. An intergalactic friendship began!".into(),
    ),
    (
      "Fairytale".into(),
      "{character} found a golden bean in the garden. Overnight it grew into a beanstalk reaching the clouds. {character} climbed up and discovered a castle made of candy. The sweetest adventure ever!".into(),
    ),
  ]
}
