//! Static lesson content: the lesson list, key-concept slides, the chat panel
//! buttons, and editor presentation hints.

use serde::Serialize;

use crate::domain::LessonKind;
use crate::session::{QuizAction, StoryAction};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LessonInfo {
  pub lesson: LessonKind,
  pub title: &'static str,
  pub description: &'static str,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ConceptSlide {
  pub title: &'static str,
  pub bullets: Vec<&'static str>,
  pub code: &'static str,
}

/// A chat panel button: the identifier sent back plus its label.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AgentActionInfo {
  pub id: &'static str,
  pub label: &'static str,
}

/// How the external editor widget should present a lesson's text.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct EditorHint {
  pub language: &'static str,
  pub hint: &'static str,
}

pub fn lessons() -> Vec<LessonInfo> {
  vec![
    LessonInfo {
      lesson: LessonKind::Quiz,
      title: "JSON List Quiz",
      description: "Build a quiz game by editing JSON. Learn about arrays, variables, and if/else logic.",
    },
    LessonInfo {
      lesson: LessonKind::Story,
      title: "Story Maker",
      description: "Create stories with dropdowns and template literals. Learn about state, events, and string templates.",
    },
  ]
}

pub fn actions(lesson: LessonKind) -> Vec<AgentActionInfo> {
  match lesson {
    LessonKind::Quiz => QuizAction::ALL
      .iter()
      .map(|a| AgentActionInfo { id: a.id(), label: a.label() })
      .collect(),
    LessonKind::Story => StoryAction::ALL
      .iter()
      .map(|a| AgentActionInfo { id: a.id(), label: a.label() })
      .collect(),
  }
}

pub fn editor_hint(lesson: LessonKind) -> EditorHint {
  match lesson {
    LessonKind::Quiz => EditorHint { language: "json", hint: "Edit the code below — the preview updates live!" },
    LessonKind::Story => EditorHint {
      language: "typescript",
      hint: "Edit the React code below — the story updates live!",
    },
  }
}

pub fn concepts(lesson: LessonKind) -> Vec<ConceptSlide> {
  match lesson {
    LessonKind::Quiz => vec![
      ConceptSlide {
        title: "Arrays of Objects",
        bullets: vec![
          "questions is an array — a list of items",
          "Each item is an object with prompt, choices, correctIndex",
          "You can add or remove items from the list",
        ],
        code: "\"questions\": [\n  { \"prompt\": \"...\", \"choices\": [...] }\n]",
      },
      ConceptSlide {
        title: "Rendering Choices",
        bullets: vec![
          "We loop over the choices array with .map()",
          "Each choice becomes a clickable button",
          "The index tells us which button was clicked",
        ],
        code: "choices.map((choice, i) =>\n  <button onClick={() => pick(i)}>\n    {choice}\n  </button>\n)",
      },
      ConceptSlide {
        title: "IF / ELSE Logic",
        bullets: vec![
          "IF the picked index matches correctIndex → correct!",
          "ELSE → wrong answer, show the right one",
          "This is how computers make decisions",
        ],
        code: "if (picked === correctIndex) {\n  score = score + points  // correct!\n} else {\n  // show right answer\n}",
      },
      ConceptSlide {
        title: "Score State",
        bullets: vec![
          "score is a state variable — it changes over time",
          "useState(0) starts the score at zero",
          "Each correct answer adds pointsPerQuestion",
        ],
        code: "const [score, setScore] = useState(0)\n\n// on correct answer:\nsetScore(score + pointsPerQuestion)",
      },
    ],
    LessonKind::Story => vec![
      ConceptSlide {
        title: "State with useState",
        bullets: vec![
          "useState stores the current selection",
          "When state changes, the page re-renders",
          "We have two pieces of state: character and storyType",
        ],
        code: "const [character, setCharacter]\n  = useState(CHARACTERS[0]);\nconst [storyType, setStoryType]\n  = useState(STORY_TYPES[0]);",
      },
      ConceptSlide {
        title: "Arrays",
        bullets: vec![
          "CHARACTERS and STORY_TYPES are arrays (lists)",
          "Arrays hold multiple values in order",
          "You can add or remove items from the list",
        ],
        code: "const CHARACTERS = [\n  \"Wizard\", \"Astronaut\", \"Detective\"\n];\nconst STORY_TYPES = [\n  \"Adventure\", \"Mystery\", \"Funny\"\n];",
      },
      ConceptSlide {
        title: "IF / ELSE + Template Literals",
        bullets: vec![
          "if/else picks which story template to use",
          "Template literals (`...`) let you embed variables",
          "${character} gets replaced with the real value",
        ],
        code: "if (storyType === \"Adventure\") {\n  return `${character} set off\n    on a wild adventure...`;\n} else if (storyType === \"Mystery\") {\n  return `${character} noticed\n    something strange...`;\n}",
      },
      ConceptSlide {
        title: "Derived UI",
        bullets: vec![
          "The story is computed from state, not stored separately",
          "Every time character or storyType changes, it recalculates",
          "This is called derived state — it comes from other values",
        ],
        code: "// story updates automatically:\nconst story = generateStory(\n  character, storyType\n);",
      },
    ],
  }
}
