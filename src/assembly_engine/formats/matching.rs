//! Matching shapes: render the reconstructor's pairing payload back out of
//! the parent's attribute map, resolving item media references to absolute
//! URLs. `correctAnswer` is the stored label→label answer map.

use serde::{Deserialize, Serialize};

use crate::assembly_engine::formats::{
    formatted, prompt_of, typed_meta, CorrectAnswer, ExerciseContent, FormattedExercise,
};
use crate::assembly_engine::media::MediaResolver;
use crate::assembly_engine::models::{Exercise, ExerciseKind};
use crate::assembly_engine::reconstructor::{
    AnswerMap, MatchItemAudio, MatchItemImage, MatchItemText,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenImageMatchContent {
    pub prompt: String,
    pub left_items: Vec<MatchItemAudio>,
    pub right_items: Vec<MatchItemImage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadImageMatchContent {
    pub prompt: String,
    pub left_items: Vec<MatchItemText>,
    pub right_items: Vec<MatchItemImage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDialogueMatchContent {
    pub prompt: String,
    pub left_items: Vec<MatchItemText>,
    pub right_items: Vec<MatchItemText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListenImageMatchMeta {
    audios: Vec<MatchItemAudio>,
    images: Vec<MatchItemImage>,
    answer_map: AnswerMap,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReadImageMatchMeta {
    texts: Vec<MatchItemText>,
    images: Vec<MatchItemImage>,
    answer_map: AnswerMap,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReadDialogueMatchMeta {
    shuffled_questions: Vec<MatchItemText>,
    shuffled_answers: Vec<MatchItemText>,
    answers: AnswerMap,
}

fn resolve_audios(items: Vec<MatchItemAudio>, media: &MediaResolver<'_>) -> Vec<MatchItemAudio> {
    items
        .into_iter()
        .map(|mut item| {
            item.audio_url = media.resolve_opt(item.audio_url.as_deref());
            item
        })
        .collect()
}

fn resolve_images(items: Vec<MatchItemImage>, media: &MediaResolver<'_>) -> Vec<MatchItemImage> {
    items
        .into_iter()
        .map(|mut item| {
            item.image_url = media.resolve_opt(item.image_url.as_deref());
            item
        })
        .collect()
}

pub fn listen_image_match(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let meta: ListenImageMatchMeta = typed_meta(exercise);
    let content = ListenImageMatchContent {
        prompt: prompt_of(exercise),
        left_items: resolve_audios(meta.audios, media),
        right_items: resolve_images(meta.images, media),
    };
    formatted(
        exercise,
        ExerciseKind::ListenImageMatch,
        ExerciseContent::ListenImageMatch(content),
        CorrectAnswer::Mapping(meta.answer_map),
    )
}

pub fn read_image_match(exercise: &Exercise, media: &MediaResolver<'_>) -> FormattedExercise {
    let meta: ReadImageMatchMeta = typed_meta(exercise);
    let content = ReadImageMatchContent {
        prompt: prompt_of(exercise),
        left_items: meta.texts,
        right_items: resolve_images(meta.images, media),
    };
    formatted(
        exercise,
        ExerciseKind::ReadImageMatch,
        ExerciseContent::ReadImageMatch(content),
        CorrectAnswer::Mapping(meta.answer_map),
    )
}

pub fn read_dialogue_match(exercise: &Exercise) -> FormattedExercise {
    let meta: ReadDialogueMatchMeta = typed_meta(exercise);
    let content = ReadDialogueMatchContent {
        prompt: prompt_of(exercise),
        left_items: meta.shuffled_questions,
        right_items: meta.shuffled_answers,
    };
    formatted(
        exercise,
        ExerciseKind::ReadDialogueMatch,
        ExerciseContent::ReadDialogueMatch(content),
        CorrectAnswer::Mapping(meta.answers),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly_engine::media::MediaConfig;
    use crate::assembly_engine::models::AttrMap;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn reconstructed_payload_renders_with_absolute_urls() {
        let mut meta = AttrMap::new();
        meta.insert(
            "audios".into(),
            json!([{ "label": "A", "audioUrl": "audio/a.mp3", "listeningText": "你好" }]),
        );
        meta.insert(
            "images".into(),
            json!([{ "label": "A", "imageUrl": "/media/img/a.png" }]),
        );
        meta.insert("answer_map".into(), json!({ "A": "A" }));

        let exercise = Exercise {
            id: Uuid::new_v4(),
            parent_exercise_id: None,
            word_id: None,
            type_name: "LISTEN_IMAGE_MATCH".into(),
            prompt: Some("连线".into()),
            meta,
            display_order: 0,
            media_links: Vec::new(),
        };

        let config = MediaConfig::new("/media");
        let out = listen_image_match(
            &exercise,
            &MediaResolver::new(&config, Some("https://api.example.com")),
        );
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json["content"]["leftItems"][0]["audioUrl"],
            "https://api.example.com/media/audio/a.mp3"
        );
        assert_eq!(
            json["content"]["rightItems"][0]["imageUrl"],
            "https://api.example.com/media/img/a.png"
        );
        assert_eq!(json["correctAnswer"], json!({ "A": "A" }));
    }

    #[test]
    fn empty_payload_renders_empty_sides() {
        let exercise = Exercise {
            id: Uuid::new_v4(),
            parent_exercise_id: None,
            word_id: None,
            type_name: "READ_DIALOGUE_MATCH".into(),
            prompt: None,
            meta: AttrMap::new(),
            display_order: 0,
            media_links: Vec::new(),
        };
        let out = read_dialogue_match(&exercise);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["content"]["leftItems"], json!([]));
        assert_eq!(json["content"]["rightItems"], json!([]));
        assert_eq!(json["correctAnswer"], json!({}));
    }
}
