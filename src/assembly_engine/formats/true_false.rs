//! True/false shapes: a statement to judge against audio, an image, or a
//! short passage. `correctAnswer` is always a bool (default `false`).

use serde::{Deserialize, Serialize};

use crate::assembly_engine::formats::{
    formatted, prompt_of, typed_meta, CorrectAnswer, ExerciseContent, FormattedExercise,
};
use crate::assembly_engine::media::MediaResolver;
use crate::assembly_engine::models::{Exercise, ExerciseKind};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenImageTrueFalseContent {
    pub prompt: String,
    pub audio_url: Option<String>,
    pub listening_text: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadImageTrueFalseContent {
    pub prompt: String,
    pub statement: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenSentenceTfContent {
    pub prompt: String,
    pub audio_url: Option<String>,
    pub listening_text: String,
    pub statement: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSentenceTfContent {
    pub prompt: String,
    pub passage: String,
    pub statement: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListenImageMeta {
    listening_text: String,
    correct_answer: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReadImageMeta {
    /// The word the learner judges against the image.
    word: String,
    correct_answer: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListenSentenceMeta {
    listening_text: String,
    statement: String,
    correct_answer: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReadSentenceMeta {
    passage: String,
    statement: String,
    correct_answer: bool,
}

pub fn listen_image(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let meta: ListenImageMeta = typed_meta(exercise);
    let urls = media.role_urls(exercise);
    let content = ListenImageTrueFalseContent {
        prompt: prompt_of(exercise),
        audio_url: urls.get("prompt_audio").cloned(),
        listening_text: meta.listening_text,
        image_url: urls.get("stem_image").cloned(),
    };
    formatted(
        exercise,
        ExerciseKind::ListenImageTrueFalse,
        ExerciseContent::ListenImageTrueFalse(content),
        CorrectAnswer::Bool(meta.correct_answer),
    )
}

pub fn read_image(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let meta: ReadImageMeta = typed_meta(exercise);
    let urls = media.role_urls(exercise);
    let content = ReadImageTrueFalseContent {
        prompt: prompt_of(exercise),
        statement: meta.word,
        image_url: urls.get("stem_image").cloned(),
    };
    formatted(
        exercise,
        ExerciseKind::ReadImageTrueFalse,
        ExerciseContent::ReadImageTrueFalse(content),
        CorrectAnswer::Bool(meta.correct_answer),
    )
}

pub fn listen_sentence(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let meta: ListenSentenceMeta = typed_meta(exercise);
    let urls = media.role_urls(exercise);
    let content = ListenSentenceTfContent {
        prompt: prompt_of(exercise),
        audio_url: urls.get("prompt_audio").cloned(),
        listening_text: meta.listening_text,
        statement: meta.statement,
    };
    formatted(
        exercise,
        ExerciseKind::ListenSentenceTf,
        ExerciseContent::ListenSentenceTf(content),
        CorrectAnswer::Bool(meta.correct_answer),
    )
}

pub fn read_sentence(exercise: &Exercise) -> FormattedExercise {
    let meta: ReadSentenceMeta = typed_meta(exercise);
    let content = ReadSentenceTfContent {
        prompt: prompt_of(exercise),
        passage: meta.passage,
        statement: meta.statement,
    };
    formatted(
        exercise,
        ExerciseKind::ReadSentenceTf,
        ExerciseContent::ReadSentenceTf(content),
        CorrectAnswer::Bool(meta.correct_answer),
    )
}
