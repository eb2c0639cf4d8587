//! Polymorphic formatting: flat exercise entities → client-ready content
//! objects.
//!
//! ## Module overview
//!
//! | Module       | Kinds |
//! |--------------|-------|
//! | `true_false` | LISTEN_IMAGE_TRUE_FALSE, READ_IMAGE_TRUE_FALSE, LISTEN_SENTENCE_TF, READ_SENTENCE_TF |
//! | `choice`     | LISTEN_IMAGE_MC, LISTEN_SENTENCE_QA, READ_SENTENCE_COMPREHENSION_CHOICE, READ_WORD_GAP_FILL |
//! | `matching`   | LISTEN_IMAGE_MATCH, READ_IMAGE_MATCH, READ_DIALOGUE_MATCH |
//! | `word_order` | READ_WORD_ORDER |
//!
//! Dispatch is purely by the stored type name. Every branch reads its
//! type-specific fields through a typed meta struct with explicit defaults,
//! so a missing optional field can never abort a batch; an unrecognized type
//! name becomes an `UNKNOWN` passthrough record instead of an error.

pub mod choice;
pub mod matching;
pub mod true_false;
pub mod word_order;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::assembly_engine::media::{MediaConfig, MediaResolver};
use crate::assembly_engine::models::{Exercise, ExerciseKind};

/// Type tag given to exercises whose type name has no formatter branch.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

// ---------------------------------------------------------------------------
// Client-facing envelope pieces
// ---------------------------------------------------------------------------

/// A text multiple-choice option (`{label, text, pinyin}`), both as stored
/// in the attribute map and as rendered to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOption {
    pub label: String,
    pub text: String,
    pub pinyin: String,
}

/// The externally-visible correct answer; its shape depends on the kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Bool(bool),
    Label(String),
    Sequence(Vec<String>),
    Mapping(BTreeMap<String, String>),
    /// Unknown passthrough records; serializes as `null`.
    None,
}

/// One exercise-type-specific content shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExerciseContent {
    ListenImageTrueFalse(true_false::ListenImageTrueFalseContent),
    ReadImageTrueFalse(true_false::ReadImageTrueFalseContent),
    ListenSentenceTf(true_false::ListenSentenceTfContent),
    ReadSentenceTf(true_false::ReadSentenceTfContent),
    ListenImageMc(choice::ListenImageMcContent),
    ListenSentenceQa(choice::ListenSentenceQaContent),
    ReadSentenceComprehensionChoice(choice::ReadSentenceComprehensionChoiceContent),
    ReadWordGapFill(choice::ReadWordGapFillContent),
    ListenImageMatch(matching::ListenImageMatchContent),
    ReadImageMatch(matching::ReadImageMatchContent),
    ReadDialogueMatch(matching::ReadDialogueMatchContent),
    ReadWordOrder(word_order::ReadWordOrderContent),
    Unknown(UnknownContent),
}

/// Passthrough content for unrecognized type names.
#[derive(Debug, Clone, Serialize)]
pub struct UnknownContent {
    pub prompt: String,
}

/// One fully formatted exercise, tagged with its type name for client-side
/// discrimination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedExercise {
    pub exercise_id: String,
    pub exercise_type: String,
    pub content: ExerciseContent,
    pub correct_answer: CorrectAnswer,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Format a batch in input order.
///
/// `external_base` is the per-request address used to absolutize media URLs
/// when the configured public base is a bare path.
pub fn format_exercises(
    exercises: &[Exercise],
    media: &MediaConfig,
    external_base: Option<&str>,
) -> Vec<FormattedExercise> {
    let resolver = MediaResolver::new(media, external_base);
    exercises
        .iter()
        .map(|exercise| format_one(exercise, &resolver))
        .collect()
}

fn format_one(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let Some(kind) = ExerciseKind::from_name(&exercise.type_name) else {
        warn!(
            exercise_id = %exercise.id,
            type_name = %exercise.type_name,
            "no formatter branch for type, passing through as UNKNOWN"
        );
        return FormattedExercise {
            exercise_id: exercise.id.to_string(),
            exercise_type: UNKNOWN_TYPE.to_string(),
            content: ExerciseContent::Unknown(UnknownContent { prompt: prompt_of(exercise) }),
            correct_answer: CorrectAnswer::None,
        };
    };

    match kind {
        ExerciseKind::ListenImageTrueFalse => true_false::listen_image(exercise, media),
        ExerciseKind::ReadImageTrueFalse => true_false::read_image(exercise, media),
        ExerciseKind::ListenSentenceTf => true_false::listen_sentence(exercise, media),
        ExerciseKind::ReadSentenceTf => true_false::read_sentence(exercise),
        ExerciseKind::ListenImageMc => choice::listen_image_mc(exercise, media),
        ExerciseKind::ListenSentenceQa => choice::listen_sentence_qa(exercise, media),
        ExerciseKind::ReadSentenceComprehensionChoice => {
            choice::read_sentence_comprehension(exercise)
        }
        ExerciseKind::ReadWordGapFill => choice::read_word_gap_fill(exercise),
        ExerciseKind::ListenImageMatch => matching::listen_image_match(exercise, media),
        ExerciseKind::ReadImageMatch => matching::read_image_match(exercise, media),
        ExerciseKind::ReadDialogueMatch => matching::read_dialogue_match(exercise),
        ExerciseKind::ReadWordOrder => word_order::read_word_order(exercise),
    }
}

// ---------------------------------------------------------------------------
// Shared branch plumbing
// ---------------------------------------------------------------------------

/// Deserialize the attribute map into a typed per-kind meta struct, falling
/// back to defaults when the map does not fit the expected shape.
pub(crate) fn typed_meta<T: DeserializeOwned + Default>(exercise: &Exercise) -> T {
    serde_json::from_value(Value::Object(exercise.meta.clone())).unwrap_or_default()
}

pub(crate) fn prompt_of(exercise: &Exercise) -> String {
    exercise.prompt.clone().unwrap_or_default()
}

pub(crate) fn formatted(
    exercise: &Exercise,
    kind: ExerciseKind,
    content: ExerciseContent,
    correct_answer: CorrectAnswer,
) -> FormattedExercise {
    FormattedExercise {
        exercise_id: exercise.id.to_string(),
        exercise_type: kind.name().to_string(),
        content,
        correct_answer,
    }
}
