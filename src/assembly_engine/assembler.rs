//! Single entry point `assemble_session()` — runs the full pipeline:
//! selection, matching reconstruction, dedup, formatting, envelope.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::assembly_engine::error::AssemblyError;
use crate::assembly_engine::formats;
use crate::assembly_engine::helpers::seeded_rng;
use crate::assembly_engine::media::MediaConfig;
use crate::assembly_engine::models::{
    Exercise, SessionOutcome, SessionRequest, SessionResponse,
};
use crate::assembly_engine::reconstructor::reconstruct_matching;
use crate::assembly_engine::selector;
use crate::assembly_engine::store::ContentStore;

/// Keep the first occurrence of each id; reconstruction can resolve several
/// sampled children to the same parent.
fn dedup_by_id(exercises: Vec<Exercise>) -> Vec<Exercise> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    exercises
        .into_iter()
        .filter(|exercise| seen.insert(exercise.id))
        .collect()
}

fn session_id<R: Rng>(rng: &mut R) -> String {
    format!("session_{}", rng.gen_range(1000..10000))
}

/// Assemble one practice session.
///
/// The store handle is borrowed only for the duration of the call; the
/// pipeline is synchronous and performs no I/O beyond the store fetches.
/// `external_base` is the caller's address used to absolutize media URLs
/// when the configured public base is a bare path.
///
/// Errors: an unparseable or unresolvable lesson id is
/// [`AssemblyError::LessonNotFound`] (parse failures are rejected before any
/// store call); store failures propagate untranslated. A resolvable lesson
/// with zero candidates is [`SessionOutcome::InsufficientContent`], not an
/// error.
pub fn assemble_session<S: ContentStore>(
    store: &S,
    request: &SessionRequest,
    media: &MediaConfig,
    external_base: Option<&str>,
) -> Result<SessionOutcome, AssemblyError> {
    let lesson_id = Uuid::parse_str(&request.lesson_id)
        .map_err(|_| AssemblyError::LessonNotFound(request.lesson_id.clone()))?;
    let lesson = store
        .resolve_lesson(lesson_id)?
        .ok_or_else(|| AssemblyError::LessonNotFound(request.lesson_id.clone()))?;

    let target = selector::target_count(request.duration, &request.exercise_types);
    let candidates = store.find_candidate_exercises(lesson_id, &request.exercise_types)?;
    debug!(
        %lesson_id,
        target,
        candidates = candidates.len(),
        "selected candidate pool"
    );
    if candidates.is_empty() {
        return Ok(SessionOutcome::InsufficientContent);
    }

    let mut rng: StdRng = seeded_rng(request.rng_seed);
    let selected = selector::sample_candidates(&mut rng, candidates, target);
    let reconstructed = reconstruct_matching(store, selected)?;
    let unique = dedup_by_id(reconstructed);
    let exercises =
        formats::format_exercises(&unique, media, external_base);
    debug!(count = exercises.len(), "assembled session");

    Ok(SessionOutcome::Session(SessionResponse {
        phase_id: lesson.phase_id.to_string(),
        topic_id: lesson.topic_id.to_string(),
        duration: request.duration,
        count: exercises.len(),
        session_id: session_id(&mut rng),
        exercises,
    }))
}
