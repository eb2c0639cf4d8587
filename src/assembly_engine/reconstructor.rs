//! Matching-exercise reconstruction.
//!
//! Matching exercises are stored as a parent record plus one child per
//! left/right pair; the candidate query returns the children flat. This
//! module regroups each family under its parent, shuffles both sides with
//! labelled positions, and stashes the synthesized payload into the parent's
//! in-memory attribute map for the formatter to read back.
//!
//! The child `display_order` is the only source of the original left/right
//! correspondence: children are always re-sorted by it before shuffling, so
//! reconstruction is independent of arrival order.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::assembly_engine::error::AssemblyError;
use crate::assembly_engine::helpers::{label_for, seeded_rng, shuffle_indices};
use crate::assembly_engine::models::{AttrMap, Exercise, ExerciseKind};
use crate::assembly_engine::store::ContentStore;

/// Attribute-map key holding a parent's reproducibility seed.
const SEED_KEY: &str = "seed";

// ---------------------------------------------------------------------------
// Pairing item shapes (stored into the parent attribute map, read back by
// the formatter; field names are the client-facing keys)
// ---------------------------------------------------------------------------

/// Left-side item of an audio→image pairing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchItemAudio {
    pub label: String,
    pub audio_url: Option<String>,
    pub listening_text: String,
}

/// Right-side item of an image pairing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchItemImage {
    pub label: String,
    pub image_url: Option<String>,
}

/// Text item (word/pinyin pair or dialogue line).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchItemText {
    pub label: String,
    pub text: String,
    pub pinyin: String,
}

/// Label→label bijection recording which right item answers each left item.
pub type AnswerMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

/// Regroup matching-type children under their parents.
///
/// Root exercises pass through untouched; each parent referenced by a
/// matching child is reconstructed at most once; stray children of
/// non-matching kinds are dropped. Structurally broken groups (missing
/// parent, no children, mismatched left/right counts) are silently dropped
/// from the batch. Output may contain the same parent only once, but callers
/// still dedup by identity afterwards since non-matching duplicates can
/// survive selection.
pub fn reconstruct_matching<S: ContentStore>(
    store: &S,
    exercises: Vec<Exercise>,
) -> Result<Vec<Exercise>, AssemblyError> {
    let mut out = Vec::with_capacity(exercises.len());
    let mut processed_parents: HashSet<Uuid> = HashSet::new();

    for exercise in exercises {
        let kind = ExerciseKind::from_name(&exercise.type_name);
        match (kind, exercise.parent_exercise_id) {
            (Some(kind), Some(parent_id)) if kind.is_matching() => {
                if !processed_parents.insert(parent_id) {
                    continue;
                }
                if let Some(parent) = reconstruct_group(store, kind, parent_id)? {
                    out.push(parent);
                }
            }
            (_, None) => out.push(exercise),
            // A child of a non-matching kind carries partial data only its
            // parent can present; without a reconstruction rule it is
            // dropped.
            _ => {}
        }
    }
    Ok(out)
}

fn reconstruct_group<S: ContentStore>(
    store: &S,
    kind: ExerciseKind,
    parent_id: Uuid,
) -> Result<Option<Exercise>, AssemblyError> {
    let Some(group) = store.find_parent_with_children(parent_id)? else {
        warn!(%parent_id, "matching parent missing, dropping group");
        return Ok(None);
    };
    if group.children.is_empty() {
        warn!(%parent_id, "matching parent has no children, dropping group");
        return Ok(None);
    }

    let mut children = group.children;
    children.sort_by_key(|child| child.display_order);

    let seed = group.parent.meta.get(SEED_KEY).and_then(Value::as_u64);
    let mut rng = seeded_rng(seed);

    let mut parent = group.parent;
    let payload = match kind {
        ExerciseKind::ListenImageMatch => audio_image_payload(&children, &mut rng),
        ExerciseKind::ReadImageMatch => text_image_payload(&children, &mut rng),
        ExerciseKind::ReadDialogueMatch => dialogue_payload(&children, &mut rng),
        _ => None,
    };
    let Some(payload) = payload else {
        warn!(%parent_id, kind = %kind, "left/right item mismatch, dropping group");
        return Ok(None);
    };

    store_payload(&mut parent.meta, payload);
    Ok(Some(parent))
}

// ---------------------------------------------------------------------------
// Per-sub-kind item extraction
// ---------------------------------------------------------------------------

fn meta_str(meta: &AttrMap, key: &str) -> String {
    meta.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn audio_image_payload<R: Rng>(children: &[Exercise], rng: &mut R) -> Option<Payload> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for child in children {
        if let Some(url) = child.media_file_url("prompt_audio") {
            left.push(MatchItemAudio {
                label: String::new(),
                audio_url: Some(url.to_string()),
                listening_text: meta_str(&child.meta, "listening_text"),
            });
        }
        if let Some(url) = child.media_file_url("correct_image") {
            right.push(MatchItemImage {
                label: String::new(),
                image_url: Some(url.to_string()),
            });
        }
    }
    if left.is_empty() || left.len() != right.len() {
        return None;
    }
    let (left, right, answer_map) = shuffle_pairing(rng, left, right);
    Some(Payload::AudioImage { audios: left, images: right, answer_map })
}

fn text_image_payload<R: Rng>(children: &[Exercise], rng: &mut R) -> Option<Payload> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for child in children {
        left.push(MatchItemText {
            label: String::new(),
            text: meta_str(&child.meta, "word"),
            pinyin: meta_str(&child.meta, "pinyin"),
        });
        if let Some(url) = child.media_file_url("correct_image") {
            right.push(MatchItemImage {
                label: String::new(),
                image_url: Some(url.to_string()),
            });
        }
    }
    if left.is_empty() || left.len() != right.len() {
        return None;
    }
    let (left, right, answer_map) = shuffle_pairing(rng, left, right);
    Some(Payload::TextImage { texts: left, images: right, answer_map })
}

fn dialogue_payload<R: Rng>(children: &[Exercise], rng: &mut R) -> Option<Payload> {
    let mut utterances = Vec::new();
    let mut replies = Vec::new();
    for child in children {
        utterances.push(MatchItemText {
            label: String::new(),
            text: meta_str(&child.meta, "utterance"),
            pinyin: meta_str(&child.meta, "utter_pinyin"),
        });
        replies.push(MatchItemText {
            label: String::new(),
            text: meta_str(&child.meta, "reply"),
            pinyin: meta_str(&child.meta, "reply_pinyin"),
        });
    }
    if utterances.is_empty() {
        return None;
    }
    let (questions, answers, answer_map) = shuffle_pairing(rng, utterances, replies);
    Some(Payload::Dialogue { shuffled_questions: questions, shuffled_answers: answers, answers: answer_map })
}

// ---------------------------------------------------------------------------
// Label shuffling
// ---------------------------------------------------------------------------

trait Labelled {
    fn set_label(&mut self, label: String);
}

impl Labelled for MatchItemAudio {
    fn set_label(&mut self, label: String) {
        self.label = label;
    }
}

impl Labelled for MatchItemImage {
    fn set_label(&mut self, label: String) {
        self.label = label;
    }
}

impl Labelled for MatchItemText {
    fn set_label(&mut self, label: String) {
        self.label = label;
    }
}

/// Shuffle both sides independently, label positions `A..`, and derive the
/// answer map: for each original pair index `i`, the label of `i`'s shuffled
/// left position maps to the label of `i`'s shuffled right position. Both
/// shuffles draw from the same RNG in a fixed order (left first), keeping
/// the whole pairing reproducible per seed.
fn shuffle_pairing<R: Rng, L: Labelled, T: Labelled>(
    rng: &mut R,
    left: Vec<L>,
    right: Vec<T>,
) -> (Vec<L>, Vec<T>, AnswerMap) {
    let n = left.len();
    debug_assert_eq!(n, right.len());

    let left_order = shuffle_indices(rng, n);
    let right_order = shuffle_indices(rng, n);

    // Inverse permutations: original index → shuffled position.
    let mut left_pos = vec![0usize; n];
    let mut right_pos = vec![0usize; n];
    for (pos, &orig) in left_order.iter().enumerate() {
        left_pos[orig] = pos;
    }
    for (pos, &orig) in right_order.iter().enumerate() {
        right_pos[orig] = pos;
    }

    let mut answer_map = AnswerMap::new();
    for i in 0..n {
        answer_map.insert(label_for(left_pos[i]), label_for(right_pos[i]));
    }

    let shuffled_left = place_items(&left_order, left);
    let shuffled_right = place_items(&right_order, right);

    (shuffled_left, shuffled_right, answer_map)
}

fn place_items<T: Labelled>(order: &[usize], items: Vec<T>) -> Vec<T> {
    // `order` is a permutation of 0..items.len(), so every slot is taken
    // exactly once.
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut placed = Vec::with_capacity(slots.len());
    for (pos, &orig) in order.iter().enumerate() {
        if let Some(mut item) = slots[orig].take() {
            item.set_label(label_for(pos));
            placed.push(item);
        }
    }
    placed
}

// ---------------------------------------------------------------------------
// Payload storage
// ---------------------------------------------------------------------------

/// The synthesized pairing data, keyed per sub-kind exactly as the formatter
/// expects it back from the attribute map.
enum Payload {
    AudioImage {
        audios: Vec<MatchItemAudio>,
        images: Vec<MatchItemImage>,
        answer_map: AnswerMap,
    },
    TextImage {
        texts: Vec<MatchItemText>,
        images: Vec<MatchItemImage>,
        answer_map: AnswerMap,
    },
    Dialogue {
        shuffled_questions: Vec<MatchItemText>,
        shuffled_answers: Vec<MatchItemText>,
        answers: AnswerMap,
    },
}

fn to_value<T: Serialize>(items: &T) -> Value {
    serde_json::to_value(items).unwrap_or(Value::Null)
}

fn store_payload(meta: &mut AttrMap, payload: Payload) {
    match payload {
        Payload::AudioImage { audios, images, answer_map } => {
            meta.insert("audios".into(), to_value(&audios));
            meta.insert("images".into(), to_value(&images));
            meta.insert("answer_map".into(), to_value(&answer_map));
        }
        Payload::TextImage { texts, images, answer_map } => {
            meta.insert("texts".into(), to_value(&texts));
            meta.insert("images".into(), to_value(&images));
            meta.insert("answer_map".into(), to_value(&answer_map));
        }
        Payload::Dialogue { shuffled_questions, shuffled_answers, answers } => {
            meta.insert("shuffled_questions".into(), to_value(&shuffled_questions));
            meta.insert("shuffled_answers".into(), to_value(&shuffled_answers));
            meta.insert("answers".into(), to_value(&answers));
        }
    }
}
