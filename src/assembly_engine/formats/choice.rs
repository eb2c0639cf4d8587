//! Single-choice shapes: pick one option by label. The image variant
//! resolves its option images from `option_image_<label>` media links; the
//! text variants carry `{label, text, pinyin}` options straight from the
//! attribute map.
//!
//! Answer-key quirk carried over from the catalog: LISTEN_IMAGE_MC stores
//! its answer under `correct_answer`, the text variants under
//! `correct_label`.

use serde::{Deserialize, Serialize};

use crate::assembly_engine::formats::{
    formatted, prompt_of, typed_meta, CorrectAnswer, ExerciseContent, FormattedExercise,
    TextOption,
};
use crate::assembly_engine::media::MediaResolver;
use crate::assembly_engine::models::{Exercise, ExerciseKind};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McOptionImage {
    pub label: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenImageMcContent {
    pub prompt: String,
    pub audio_url: Option<String>,
    pub listening_text: String,
    pub options: Vec<McOptionImage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenSentenceQaContent {
    pub prompt: String,
    pub audio_url: Option<String>,
    pub listening_text: String,
    pub question: String,
    pub options: Vec<TextOption>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSentenceComprehensionChoiceContent {
    pub prompt: String,
    pub passage: String,
    pub question: String,
    pub options: Vec<TextOption>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadWordGapFillContent {
    pub prompt: String,
    /// The sentence with its blank, rendered as the question.
    pub question: String,
    pub options: Vec<TextOption>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListenImageMcMeta {
    listening_text: String,
    options: Vec<TextOption>,
    correct_answer: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListenSentenceQaMeta {
    listening_text: String,
    question: String,
    options: Vec<TextOption>,
    correct_label: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComprehensionMeta {
    passage: String,
    question: String,
    options: Vec<TextOption>,
    correct_label: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GapFillMeta {
    sentence_with_blank: String,
    options: Vec<TextOption>,
    correct_label: String,
}

pub fn listen_image_mc(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let meta: ListenImageMcMeta = typed_meta(exercise);
    let urls = media.role_urls(exercise);
    let options = meta
        .options
        .iter()
        .map(|opt| McOptionImage {
            label: opt.label.clone(),
            image_url: urls.get(&format!("option_image_{}", opt.label)).cloned(),
        })
        .collect();
    let content = ListenImageMcContent {
        prompt: prompt_of(exercise),
        audio_url: urls.get("prompt_audio").cloned(),
        listening_text: meta.listening_text,
        options,
    };
    formatted(
        exercise,
        ExerciseKind::ListenImageMc,
        ExerciseContent::ListenImageMc(content),
        CorrectAnswer::Label(meta.correct_answer),
    )
}

pub fn listen_sentence_qa(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let meta: ListenSentenceQaMeta = typed_meta(exercise);
    let urls = media.role_urls(exercise);
    let content = ListenSentenceQaContent {
        prompt: prompt_of(exercise),
        audio_url: urls.get("prompt_audio").cloned(),
        listening_text: meta.listening_text,
        question: meta.question,
        options: meta.options,
    };
    formatted(
        exercise,
        ExerciseKind::ListenSentenceQa,
        ExerciseContent::ListenSentenceQa(content),
        CorrectAnswer::Label(meta.correct_label),
    )
}

pub fn read_sentence_comprehension(exercise: &Exercise) -> FormattedExercise {
    let meta: ComprehensionMeta = typed_meta(exercise);
    let content = ReadSentenceComprehensionChoiceContent {
        prompt: prompt_of(exercise),
        passage: meta.passage,
        question: meta.question,
        options: meta.options,
    };
    formatted(
        exercise,
        ExerciseKind::ReadSentenceComprehensionChoice,
        ExerciseContent::ReadSentenceComprehensionChoice(content),
        CorrectAnswer::Label(meta.correct_label),
    )
}

pub fn read_word_gap_fill(exercise: &Exercise) -> FormattedExercise {
    let meta: GapFillMeta = typed_meta(exercise);
    let content = ReadWordGapFillContent {
        prompt: prompt_of(exercise),
        question: meta.sentence_with_blank,
        options: meta.options,
    };
    formatted(
        exercise,
        ExerciseKind::ReadWordGapFill,
        ExerciseContent::ReadWordGapFill(content),
        CorrectAnswer::Label(meta.correct_label),
    )
}
