use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The schema-less, type-specific payload attached to an exercise.
///
/// Keys and value shapes depend on the exercise kind (listening text,
/// option lists, answer keys, …). The formatter reads it through typed
/// per-kind structs with explicit defaults; see `formats`.
pub type AttrMap = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Content entities (read-only, eager-loaded by the store)
// ---------------------------------------------------------------------------

/// A vocabulary unit. Owns zero or more exercises and participates in
/// lesson↔word associations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    /// Unique across the catalog.
    pub characters: String,
    pub pinyin: String,
    pub translation: String,
    pub hsk_level: u8,
}

/// A resolved lesson with its containing topic and phase.
///
/// The containment hierarchy is strict: a lesson belongs to exactly one
/// topic, a topic to exactly one phase. The engine only uses the hierarchy
/// to scope eligible words and to fill the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonContext {
    pub lesson_id: Uuid,
    pub lesson_name: String,
    pub topic_id: Uuid,
    pub topic_name: String,
    pub phase_id: Uuid,
    pub phase_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFileType {
    Image,
    Audio,
}

/// A stored file reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: Uuid,
    /// Unique; relative to the media root unless already absolute.
    pub file_url: String,
    pub file_type: MediaFileType,
    pub mime_type: Option<String>,
}

/// Associates an exercise with a media asset under a usage role
/// (`prompt_audio`, `stem_image`, `correct_image`, `option_image_<L>`, …).
/// An exercise may hold several links differing only by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaLink {
    pub usage_role: String,
    pub asset: MediaAsset,
}

/// The central entity. Read-only to this engine; the single in-memory
/// mutation is the reconstructor stashing a synthesized pairing payload
/// into `meta` on a reconstructed parent (never persisted back).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    /// Set on children of multi-part exercises. When set, `display_order`
    /// is the required ordering among siblings — for matching children it
    /// is the only source of left/right correspondence before shuffling.
    pub parent_exercise_id: Option<Uuid>,
    pub word_id: Option<Uuid>,
    /// The `ExerciseType` name; the only type discriminator in the system.
    pub type_name: String,
    pub prompt: Option<String>,
    #[serde(default)]
    pub meta: AttrMap,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub media_links: Vec<MediaLink>,
}

impl Exercise {
    /// The file_url linked under `role`, if any.
    pub fn media_file_url(&self, role: &str) -> Option<&str> {
        self.media_links
            .iter()
            .find(|link| link.usage_role == role)
            .map(|link| link.asset.file_url.as_str())
    }
}

/// A parent exercise together with all of its children.
///
/// The domain guarantees depth exactly one, so the aggregate is a flat
/// two-level structure rather than a recursive tree.
#[derive(Debug, Clone)]
pub struct ParentGroup {
    pub parent: Exercise,
    pub children: Vec<Exercise>,
}

// ---------------------------------------------------------------------------
// Exercise kinds
// ---------------------------------------------------------------------------

/// The closed set of supported exercise type names.
///
/// The stored type name string drives all dispatch; names outside this set
/// are formatted as `UNKNOWN` passthrough records rather than raising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseKind {
    ListenImageTrueFalse,
    ReadImageTrueFalse,
    ListenSentenceTf,
    ReadSentenceTf,
    ListenImageMc,
    ListenSentenceQa,
    ReadSentenceComprehensionChoice,
    ReadWordGapFill,
    ListenImageMatch,
    ReadImageMatch,
    ReadDialogueMatch,
    ReadWordOrder,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 12] = [
        ExerciseKind::ListenImageTrueFalse,
        ExerciseKind::ReadImageTrueFalse,
        ExerciseKind::ListenSentenceTf,
        ExerciseKind::ReadSentenceTf,
        ExerciseKind::ListenImageMc,
        ExerciseKind::ListenSentenceQa,
        ExerciseKind::ReadSentenceComprehensionChoice,
        ExerciseKind::ReadWordGapFill,
        ExerciseKind::ListenImageMatch,
        ExerciseKind::ReadImageMatch,
        ExerciseKind::ReadDialogueMatch,
        ExerciseKind::ReadWordOrder,
    ];

    pub fn from_name(name: &str) -> Option<ExerciseKind> {
        let kind = match name {
            "LISTEN_IMAGE_TRUE_FALSE" => ExerciseKind::ListenImageTrueFalse,
            "READ_IMAGE_TRUE_FALSE" => ExerciseKind::ReadImageTrueFalse,
            "LISTEN_SENTENCE_TF" => ExerciseKind::ListenSentenceTf,
            "READ_SENTENCE_TF" => ExerciseKind::ReadSentenceTf,
            "LISTEN_IMAGE_MC" => ExerciseKind::ListenImageMc,
            "LISTEN_SENTENCE_QA" => ExerciseKind::ListenSentenceQa,
            "READ_SENTENCE_COMPREHENSION_CHOICE" => {
                ExerciseKind::ReadSentenceComprehensionChoice
            }
            "READ_WORD_GAP_FILL" => ExerciseKind::ReadWordGapFill,
            "LISTEN_IMAGE_MATCH" => ExerciseKind::ListenImageMatch,
            "READ_IMAGE_MATCH" => ExerciseKind::ReadImageMatch,
            "READ_DIALOGUE_MATCH" => ExerciseKind::ReadDialogueMatch,
            "READ_WORD_ORDER" => ExerciseKind::ReadWordOrder,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            ExerciseKind::ListenImageTrueFalse => "LISTEN_IMAGE_TRUE_FALSE",
            ExerciseKind::ReadImageTrueFalse => "READ_IMAGE_TRUE_FALSE",
            ExerciseKind::ListenSentenceTf => "LISTEN_SENTENCE_TF",
            ExerciseKind::ReadSentenceTf => "READ_SENTENCE_TF",
            ExerciseKind::ListenImageMc => "LISTEN_IMAGE_MC",
            ExerciseKind::ListenSentenceQa => "LISTEN_SENTENCE_QA",
            ExerciseKind::ReadSentenceComprehensionChoice => {
                "READ_SENTENCE_COMPREHENSION_CHOICE"
            }
            ExerciseKind::ReadWordGapFill => "READ_WORD_GAP_FILL",
            ExerciseKind::ListenImageMatch => "LISTEN_IMAGE_MATCH",
            ExerciseKind::ReadImageMatch => "READ_IMAGE_MATCH",
            ExerciseKind::ReadDialogueMatch => "READ_DIALOGUE_MATCH",
            ExerciseKind::ReadWordOrder => "READ_WORD_ORDER",
        }
    }

    /// Multi-part kinds assembled from parent/child records.
    pub fn is_matching(self) -> bool {
        matches!(
            self,
            ExerciseKind::ListenImageMatch
                | ExerciseKind::ReadImageMatch
                | ExerciseKind::ReadDialogueMatch
        )
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Session request / response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub lesson_id: String,
    /// Target total practice duration in seconds.
    pub duration: u32,
    /// Requested exercise type names.
    pub exercise_types: Vec<String>,
    /// Reproduces candidate sampling and the session id. Parent-level
    /// matching shuffles are still driven by each parent's stored seed.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl SessionRequest {
    pub fn new(
        lesson_id: impl Into<String>,
        duration: u32,
        exercise_types: Vec<String>,
    ) -> Self {
        SessionRequest {
            lesson_id: lesson_id.into(),
            duration,
            exercise_types,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub phase_id: String,
    pub topic_id: String,
    pub duration: u32,
    /// Number of formatted exercises actually delivered.
    pub count: usize,
    pub session_id: String,
    pub exercises: Vec<crate::assembly_engine::formats::FormattedExercise>,
}

/// What a well-formed request produced.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Session(SessionResponse),
    /// The lesson resolved but yielded zero candidate exercises. The caller
    /// decides how to report the missing material; it is not an error here.
    InsufficientContent,
}

impl SessionOutcome {
    pub fn into_session(self) -> Option<SessionResponse> {
        match self {
            SessionOutcome::Session(resp) => Some(resp),
            SessionOutcome::InsufficientContent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in ExerciseKind::ALL {
            assert_eq!(ExerciseKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ExerciseKind::from_name("LISTEN_SOMETHING_NEW"), None);
    }

    #[test]
    fn matching_kinds_are_exactly_the_match_suffix() {
        let matching: Vec<_> = ExerciseKind::ALL
            .iter()
            .filter(|k| k.is_matching())
            .map(|k| k.name())
            .collect();
        assert_eq!(
            matching,
            ["LISTEN_IMAGE_MATCH", "READ_IMAGE_MATCH", "READ_DIALOGUE_MATCH"]
        );
    }

    #[test]
    fn session_request_accepts_client_json() {
        let req: SessionRequest = serde_json::from_str(
            r#"{
                "lessonId": "f6b2b9a2-9f7a-4d09-9a58-1d1a3f1c2b4d",
                "duration": 300,
                "exerciseTypes": ["READ_WORD_ORDER"]
            }"#,
        )
        .unwrap();
        assert_eq!(req.duration, 300);
        assert_eq!(req.exercise_types, ["READ_WORD_ORDER"]);
        assert!(req.rng_seed.is_none());
    }
}
