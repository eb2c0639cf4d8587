//! Word-ordering: arrange shuffled sentence pieces into the correct order.
//!
//! The catalog encodes the pieces two ways — a label→piece map
//! (`pieces_shuffled_label_map`) or a flat shuffled list (`pieces_shuffled`)
//! — and the answer two ways — by piece id (`answer_ids`) or by original
//! label (`answer_order`). Both are normalized into one numbered `"1","2",…`
//! sequence here; answer entries that fail to resolve are dropped.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::assembly_engine::formats::{
    formatted, CorrectAnswer, ExerciseContent, FormattedExercise,
};
use crate::assembly_engine::formats::typed_meta;
use crate::assembly_engine::models::{Exercise, ExerciseKind};

/// Default instruction shown when neither the exercise prompt nor
/// `meta.sentence` is present.
const DEFAULT_PROMPT: &str = "请将下列词语按正确顺序排列成句。";

#[derive(Debug, Clone, Serialize)]
pub struct WordOrderItem {
    pub label: String,
    #[serde(rename = "word/sentence")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadWordOrderContent {
    pub prompt: String,
    #[serde(rename = "words/sentences")]
    pub items: Vec<WordOrderItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Piece {
    id: String,
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WordOrderMeta {
    pieces_shuffled_label_map: Option<BTreeMap<String, Piece>>,
    pieces_shuffled: Option<Vec<Piece>>,
    answer_ids: Option<Vec<String>>,
    answer_order: Option<Vec<String>>,
    sentence: Option<String>,
}

fn numeric(i: usize) -> String {
    (i + 1).to_string()
}

pub fn read_word_order(exercise: &Exercise) -> FormattedExercise {
    let meta: WordOrderMeta = typed_meta(exercise);

    let mut items: Vec<WordOrderItem> = Vec::new();
    let mut answer: Vec<String> = Vec::new();

    if let Some(label_map) = &meta.pieces_shuffled_label_map {
        // Labels iterate in sorted order; numbering follows that order.
        let mut label_to_numeric: HashMap<&str, String> = HashMap::new();
        let mut id_to_numeric: HashMap<&str, String> = HashMap::new();
        for (i, (label, piece)) in label_map.iter().enumerate() {
            label_to_numeric.insert(label.as_str(), numeric(i));
            id_to_numeric.insert(piece.id.as_str(), numeric(i));
            items.push(WordOrderItem { label: numeric(i), text: piece.text.clone() });
        }
        answer = remap_answer(&meta, &id_to_numeric, &label_to_numeric);
    } else if let Some(pieces) = &meta.pieces_shuffled {
        let mut id_to_numeric: HashMap<&str, String> = HashMap::new();
        for (i, piece) in pieces.iter().enumerate() {
            id_to_numeric.insert(piece.id.as_str(), numeric(i));
            items.push(WordOrderItem { label: numeric(i), text: piece.text.clone() });
        }
        // answer_order refers to the positional A.. labels of the flat list.
        let label_to_numeric: HashMap<String, String> = (0..pieces.len())
            .map(|i| (crate::assembly_engine::helpers::label_for(i), numeric(i)))
            .collect();
        let label_refs: HashMap<&str, String> = label_to_numeric
            .iter()
            .map(|(label, num)| (label.as_str(), num.clone()))
            .collect();
        answer = remap_answer(&meta, &id_to_numeric, &label_refs);
    }

    let prompt = exercise
        .prompt
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| meta.sentence.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    formatted(
        exercise,
        ExerciseKind::ReadWordOrder,
        ExerciseContent::ReadWordOrder(ReadWordOrderContent { prompt, items }),
        CorrectAnswer::Sequence(answer),
    )
}

/// Remap the stored answer (piece ids first, original labels second) into
/// the numbered sequence, dropping entries that fail to resolve.
fn remap_answer(
    meta: &WordOrderMeta,
    id_to_numeric: &HashMap<&str, String>,
    label_to_numeric: &HashMap<&str, String>,
) -> Vec<String> {
    if let Some(ids) = &meta.answer_ids {
        ids.iter()
            .filter_map(|id| id_to_numeric.get(id.as_str()).cloned())
            .collect()
    } else if let Some(order) = &meta.answer_order {
        order
            .iter()
            .filter_map(|label| label_to_numeric.get(label.as_str()).cloned())
            .collect()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly_engine::models::AttrMap;
    use serde_json::json;
    use uuid::Uuid;

    fn exercise(meta: AttrMap) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            parent_exercise_id: None,
            word_id: None,
            type_name: "READ_WORD_ORDER".into(),
            prompt: None,
            meta,
            display_order: 0,
            media_links: Vec::new(),
        }
    }

    #[test]
    fn label_map_pieces_number_in_sorted_label_order() {
        let mut meta = AttrMap::new();
        meta.insert(
            "pieces_shuffled_label_map".into(),
            json!({
                "A": { "id": "p1", "text": "我" },
                "B": { "id": "p2", "text": "去" }
            }),
        );
        meta.insert("answer_ids".into(), json!(["p2", "p1"]));

        let out = read_word_order(&exercise(meta));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["content"]["words/sentences"][0]["label"], "1");
        assert_eq!(json["content"]["words/sentences"][0]["word/sentence"], "我");
        assert_eq!(json["content"]["words/sentences"][1]["label"], "2");
        assert_eq!(json["content"]["words/sentences"][1]["word/sentence"], "去");
        assert_eq!(
            out.correct_answer,
            CorrectAnswer::Sequence(vec!["2".into(), "1".into()])
        );
    }

    #[test]
    fn flat_list_numbers_positionally_and_maps_label_answers() {
        let mut meta = AttrMap::new();
        meta.insert(
            "pieces_shuffled".into(),
            json!([
                { "id": "p1", "text": "喝" },
                { "id": "p2", "text": "我" },
                { "id": "p3", "text": "水" }
            ]),
        );
        meta.insert("answer_order".into(), json!(["B", "A", "C"]));

        let out = read_word_order(&exercise(meta));
        assert_eq!(
            out.correct_answer,
            CorrectAnswer::Sequence(vec!["2".into(), "1".into(), "3".into()])
        );
    }

    #[test]
    fn unresolvable_answer_entries_are_dropped() {
        let mut meta = AttrMap::new();
        meta.insert(
            "pieces_shuffled".into(),
            json!([{ "id": "p1", "text": "好" }]),
        );
        meta.insert("answer_ids".into(), json!(["p1", "missing"]));

        let out = read_word_order(&exercise(meta));
        assert_eq!(out.correct_answer, CorrectAnswer::Sequence(vec!["1".into()]));
    }

    #[test]
    fn empty_meta_gets_default_prompt_and_empty_items() {
        let out = read_word_order(&exercise(AttrMap::new()));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["content"]["prompt"], DEFAULT_PROMPT);
        assert_eq!(json["content"]["words/sentences"], json!([]));
        assert_eq!(out.correct_answer, CorrectAnswer::Sequence(Vec::new()));
    }

    #[test]
    fn sentence_meta_backfills_the_prompt() {
        let mut meta = AttrMap::new();
        meta.insert("sentence".into(), json!("我去学校。"));
        let out = read_word_order(&exercise(meta));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["content"]["prompt"], "我去学校。");
    }

    #[test]
    fn empty_sentence_meta_falls_through_to_the_default_prompt() {
        let mut meta = AttrMap::new();
        meta.insert("sentence".into(), json!(""));
        let out = read_word_order(&exercise(meta));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["content"]["prompt"], DEFAULT_PROMPT);
    }
}
