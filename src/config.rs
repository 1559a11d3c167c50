//! Lesson configuration: exercise type tags, the JSON shape of every exercise, and turning
//! configuration into live [`Exercise`]s.
//!
//! Configuration is forgiving. Missing lists default to empty, a missing or `null`
//! configuration means all defaults, and the configuration may be given either inline or as
//! a string holding JSON. Only malformed JSON and unknown type tags are errors.

use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::crossword::{Crossword, Word};
use crate::exercise::Exercise;
use crate::maze::{MazeConfig, MazeExercise};
use crate::password::{PasswordConfig, PasswordExercise};
use crate::placement::{
    Category, CategoryItem, CategoryRules, CategorySort, GapFill, GapFillRules, Matching,
    MatchingRules, Pair, SortItem, Sorting, SortingRules,
};
use crate::program::{ProgramConfig, ProgramExercise, ProgramKind};
use crate::quiz::{
    PhishingConfig, PhishingQuiz, PrivacyConfig, PrivacyQuiz, UrlSafetyConfig, UrlSafetyQuiz,
};
use crate::Error;

/// The kinds of exercise a lesson can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExerciseKind {
    /// A crossword.
    Crossword,
    /// Connecting left terms to right terms.
    Matching,
    /// Filling words into a sentence.
    GapFill,
    /// Putting items in order.
    Sorting,
    /// Sorting items into categories.
    Category,
    /// Writing code.
    Code,
    /// Assembling blocks.
    Blockly,
    /// Typing a strong password.
    Password,
    /// Steering a robot through mazes.
    Maze,
    /// Spotting phishing emails.
    Phishing,
    /// Deciding what is safe to share.
    Privacy,
    /// Telling safe links from fake ones.
    UrlSafety,
}

impl ExerciseKind {
    /// Every kind, in registry order.
    pub const ALL: [ExerciseKind; 12] = [
        ExerciseKind::Crossword,
        ExerciseKind::Matching,
        ExerciseKind::GapFill,
        ExerciseKind::Sorting,
        ExerciseKind::Category,
        ExerciseKind::Code,
        ExerciseKind::Blockly,
        ExerciseKind::Password,
        ExerciseKind::Maze,
        ExerciseKind::Phishing,
        ExerciseKind::Privacy,
        ExerciseKind::UrlSafety,
    ];

    /// Looks a type tag up, ignoring case and surrounding whitespace.
    pub fn from_tag(tag: &str) -> Option<Self> {
        registration(tag).map(|registration| registration.kind)
    }

    /// The canonical type tag.
    pub fn tag(self) -> &'static str {
        REGISTRY
            .iter()
            .find(|registration| registration.kind == self)
            .map_or("", |registration| registration.tag)
    }
}

/// Reads an explicit `null` the same as a missing field.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Configuration of a crossword.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosswordConfig {
    /// The words, with their positions.
    #[serde(deserialize_with = "null_as_empty")]
    pub words: Vec<Word>,
}

/// Configuration of a matching exercise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// The pairs to connect.
    #[serde(deserialize_with = "null_as_empty")]
    pub pairs: Vec<Pair>,
}

/// Configuration of a gap-fill exercise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapFillConfig {
    /// The sentence, with `___` marking each gap.
    #[serde(deserialize_with = "null_as_empty")]
    pub sentence: String,

    /// The answer of each gap, in order.
    #[serde(deserialize_with = "null_as_empty")]
    pub answers: Vec<String>,

    /// Extra words that fit no gap.
    #[serde(deserialize_with = "null_as_empty")]
    pub distractors: Vec<String>,
}

/// Configuration of a sorting exercise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortingConfig {
    /// The items.
    #[serde(deserialize_with = "null_as_empty")]
    pub items: Vec<SortItem>,

    /// Item ids in their correct order.
    #[serde(deserialize_with = "null_as_empty")]
    pub correct_order: Vec<String>,
}

/// Configuration of a category-sort exercise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// The categories.
    #[serde(deserialize_with = "null_as_empty")]
    pub categories: Vec<Category>,

    /// The items. Older lessons call this list `categoryItems`.
    #[serde(alias = "categoryItems", deserialize_with = "null_as_empty")]
    pub items: Vec<CategoryItem>,
}

/// The parsed configuration of one exercise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExerciseConfig {
    /// A crossword.
    Crossword(CrosswordConfig),
    /// A matching exercise.
    Matching(MatchingConfig),
    /// A gap-fill exercise.
    GapFill(GapFillConfig),
    /// A sorting exercise.
    Sorting(SortingConfig),
    /// A category-sort exercise.
    Category(CategoryConfig),
    /// A code exercise.
    Code(ProgramConfig),
    /// A block exercise.
    Blockly(ProgramConfig),
    /// A password exercise.
    Password(PasswordConfig),
    /// A maze exercise.
    Maze(MazeConfig),
    /// A phishing quiz.
    Phishing(PhishingConfig),
    /// A privacy quiz.
    Privacy(PrivacyConfig),
    /// A link-safety quiz.
    UrlSafety(UrlSafetyConfig),
}

type Parser = fn(Value) -> serde_json::Result<ExerciseConfig>;

struct Registration {
    tag: &'static str,
    kind: ExerciseKind,
    parse: Parser,
}

static REGISTRY: [Registration; 12] = [
    Registration {
        tag: "CROSSWORD",
        kind: ExerciseKind::Crossword,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Crossword),
    },
    Registration {
        tag: "MATCHING",
        kind: ExerciseKind::Matching,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Matching),
    },
    Registration {
        tag: "GAPFILL",
        kind: ExerciseKind::GapFill,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::GapFill),
    },
    Registration {
        tag: "SORTING",
        kind: ExerciseKind::Sorting,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Sorting),
    },
    Registration {
        tag: "CATEGORY",
        kind: ExerciseKind::Category,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Category),
    },
    Registration {
        tag: "CODE",
        kind: ExerciseKind::Code,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Code),
    },
    Registration {
        tag: "BLOCKLY",
        kind: ExerciseKind::Blockly,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Blockly),
    },
    Registration {
        tag: "PASSWORD",
        kind: ExerciseKind::Password,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Password),
    },
    Registration {
        tag: "MAZE",
        kind: ExerciseKind::Maze,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Maze),
    },
    Registration {
        tag: "PHISHING",
        kind: ExerciseKind::Phishing,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Phishing),
    },
    Registration {
        tag: "PRIVACY",
        kind: ExerciseKind::Privacy,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::Privacy),
    },
    Registration {
        tag: "URLSAFETY",
        kind: ExerciseKind::UrlSafety,
        parse: |value| serde_json::from_value(value).map(ExerciseConfig::UrlSafety),
    },
];

fn registration(tag: &str) -> Option<&'static Registration> {
    let tag = tag.trim();
    REGISTRY
        .iter()
        .find(|registration| registration.tag.eq_ignore_ascii_case(tag))
}

/// Unwraps configuration stored as a JSON string and maps "nothing" to an empty object.
fn normalize(value: Value) -> serde_json::Result<Value> {
    let value = match value {
        Value::String(text) if text.trim().is_empty() => Value::Null,
        Value::String(text) => serde_json::from_str(&text)?,
        value => value,
    };

    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        value => value,
    })
}

impl ExerciseConfig {
    /// Parses the configuration of an exercise of type `tag`.
    pub fn from_value(tag: &str, value: Value) -> Result<Self, Error> {
        let registration =
            registration(tag).ok_or_else(|| Error::UnknownExerciseType(tag.to_string()))?;

        normalize(value)
            .and_then(registration.parse)
            .map_err(|err| Error::InvalidConfig(registration.tag.to_string(), err))
    }

    /// Parses configuration JSON text of an exercise of type `tag`.
    pub fn from_json(tag: &str, json: &str) -> Result<Self, Error> {
        Self::from_value(tag, Value::String(json.to_string()))
    }

    /// The default configuration of a kind.
    pub fn default_for(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Crossword => ExerciseConfig::Crossword(Default::default()),
            ExerciseKind::Matching => ExerciseConfig::Matching(Default::default()),
            ExerciseKind::GapFill => ExerciseConfig::GapFill(Default::default()),
            ExerciseKind::Sorting => ExerciseConfig::Sorting(Default::default()),
            ExerciseKind::Category => ExerciseConfig::Category(Default::default()),
            ExerciseKind::Code => ExerciseConfig::Code(Default::default()),
            ExerciseKind::Blockly => ExerciseConfig::Blockly(Default::default()),
            ExerciseKind::Password => ExerciseConfig::Password(Default::default()),
            ExerciseKind::Maze => ExerciseConfig::Maze(Default::default()),
            ExerciseKind::Phishing => ExerciseConfig::Phishing(Default::default()),
            ExerciseKind::Privacy => ExerciseConfig::Privacy(Default::default()),
            ExerciseKind::UrlSafety => ExerciseConfig::UrlSafety(Default::default()),
        }
    }

    /// The kind this configuration is for.
    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseConfig::Crossword(_) => ExerciseKind::Crossword,
            ExerciseConfig::Matching(_) => ExerciseKind::Matching,
            ExerciseConfig::GapFill(_) => ExerciseKind::GapFill,
            ExerciseConfig::Sorting(_) => ExerciseKind::Sorting,
            ExerciseConfig::Category(_) => ExerciseKind::Category,
            ExerciseConfig::Code(_) => ExerciseKind::Code,
            ExerciseConfig::Blockly(_) => ExerciseKind::Blockly,
            ExerciseConfig::Password(_) => ExerciseKind::Password,
            ExerciseConfig::Maze(_) => ExerciseKind::Maze,
            ExerciseConfig::Phishing(_) => ExerciseKind::Phishing,
            ExerciseConfig::Privacy(_) => ExerciseKind::Privacy,
            ExerciseConfig::UrlSafety(_) => ExerciseKind::UrlSafety,
        }
    }

    /// Builds the exercise, shuffling with the thread-local generator.
    pub fn build(self) -> Exercise {
        self.build_with(&mut rand::thread_rng())
    }

    /// Builds the exercise, shuffling with `rng`.
    pub fn build_with<R: Rng + ?Sized>(self, rng: &mut R) -> Exercise {
        match self {
            ExerciseConfig::Crossword(config) => Exercise::Crossword(Crossword::new(config.words)),
            ExerciseConfig::Matching(config) => {
                Exercise::Matching(Matching::with_rng(MatchingRules::new(config.pairs), rng))
            }
            ExerciseConfig::GapFill(config) => Exercise::GapFill(GapFill::with_rng(
                GapFillRules::new(&config.sentence, config.answers, config.distractors),
                rng,
            )),
            ExerciseConfig::Sorting(config) => Exercise::Sorting(Sorting::with_rng(
                SortingRules::new(config.items, &config.correct_order),
                rng,
            )),
            ExerciseConfig::Category(config) => Exercise::CategorySort(CategorySort::with_rng(
                CategoryRules::new(config.categories, config.items),
                rng,
            )),
            ExerciseConfig::Code(config) => {
                Exercise::Program(ProgramExercise::new(ProgramKind::Code, config))
            }
            ExerciseConfig::Blockly(config) => {
                Exercise::Program(ProgramExercise::new(ProgramKind::Blocks, config))
            }
            ExerciseConfig::Password(config) => {
                Exercise::Password(PasswordExercise::new(config))
            }
            ExerciseConfig::Maze(config) => Exercise::Maze(MazeExercise::new(config)),
            ExerciseConfig::Phishing(config) => {
                Exercise::Phishing(PhishingQuiz::from_config(config))
            }
            ExerciseConfig::Privacy(config) => Exercise::Privacy(PrivacyQuiz::from_config(config)),
            ExerciseConfig::UrlSafety(config) => {
                Exercise::UrlSafety(UrlSafetyQuiz::from_config(config))
            }
        }
    }
}

/// One exercise of a lesson, as the course backend delivers it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonExercise {
    /// Backend identifier, used when recording progress.
    pub id: u64,

    /// The type tag, e.g. `CROSSWORD`.
    #[serde(rename = "type")]
    pub exercise_type: String,

    /// Title shown in the carousel.
    pub title: Option<String>,

    /// Instruction shown above the exercise.
    pub instruction: Option<String>,

    /// The configuration, inline or as JSON text.
    pub config: Value,

    /// Position within the lesson.
    pub ordering: i64,
}

impl LessonExercise {
    /// The kind named by the type tag.
    pub fn kind(&self) -> Result<ExerciseKind, Error> {
        ExerciseKind::from_tag(&self.exercise_type)
            .ok_or_else(|| Error::UnknownExerciseType(self.exercise_type.clone()))
    }

    /// Parses the configuration.
    pub fn parse_config(&self) -> Result<ExerciseConfig, Error> {
        ExerciseConfig::from_value(&self.exercise_type, self.config.clone())
    }

    /// Builds the live exercise.
    pub fn build(&self) -> Result<Exercise, Error> {
        self.parse_config().map(ExerciseConfig::build)
    }

    /// Builds the live exercise, shuffling with `rng`.
    pub fn build_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Exercise, Error> {
        Ok(self.parse_config()?.build_with(rng))
    }
}

/// Parses a lesson's exercise list and puts it in lesson order.
pub fn parse_lesson(json: &str) -> Result<Vec<LessonExercise>, Error> {
    let mut exercises: Vec<LessonExercise> =
        serde_json::from_str(json).map_err(Error::InvalidLesson)?;
    exercises.sort_by_key(|exercise| exercise.ordering);
    Ok(exercises)
}
