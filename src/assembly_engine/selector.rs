//! Candidate selection: how many exercises a duration request needs, and a
//! uniform sample of the eligible pool.

use rand::Rng;

use crate::assembly_engine::models::Exercise;

/// Hard ceiling on exercises per session, protecting against pathological
/// duration requests.
pub const MAX_QUESTIONS_LIMIT: usize = 50;

/// Fallback for type names missing from the duration table.
pub const DEFAULT_SECONDS_PER_EXERCISE: f64 = 15.0;

/// Expected seconds a learner spends on one exercise of the given type.
///
/// Static estimates gathered from early sessions; matching and ordering
/// types take far longer than single true/false taps.
pub fn seconds_per_exercise(type_name: &str) -> f64 {
    match type_name {
        "LISTEN_IMAGE_TRUE_FALSE" => 15.0,
        "READ_IMAGE_TRUE_FALSE" => 12.0,
        "LISTEN_SENTENCE_TF" => 18.0,
        "READ_SENTENCE_TF" => 20.0,
        "LISTEN_IMAGE_MC" => 20.0,
        "LISTEN_SENTENCE_QA" => 25.0,
        "READ_SENTENCE_COMPREHENSION_CHOICE" => 30.0,
        "READ_WORD_GAP_FILL" => 20.0,
        "LISTEN_IMAGE_MATCH" => 45.0,
        "READ_IMAGE_MATCH" => 40.0,
        "READ_DIALOGUE_MATCH" => 50.0,
        "READ_WORD_ORDER" => 30.0,
        _ => DEFAULT_SECONDS_PER_EXERCISE,
    }
}

/// Mean expected duration across the requested type names; the default when
/// the list is empty.
pub fn average_duration(requested: &[String]) -> f64 {
    if requested.is_empty() {
        return DEFAULT_SECONDS_PER_EXERCISE;
    }
    let total: f64 = requested.iter().map(|name| seconds_per_exercise(name)).sum();
    total / requested.len() as f64
}

/// `clamp(ceil(duration / avg), 1, MAX_QUESTIONS_LIMIT)`.
pub fn target_count(duration_secs: u32, requested: &[String]) -> usize {
    let avg = average_duration(requested);
    let estimate = (f64::from(duration_secs) / avg).ceil() as usize;
    estimate.clamp(1, MAX_QUESTIONS_LIMIT)
}

/// Uniform sample without replacement of `target` exercises.
///
/// A pool at or under the target is returned whole, in arrival order.
pub fn sample_candidates<R: Rng>(
    rng: &mut R,
    mut pool: Vec<Exercise>,
    target: usize,
) -> Vec<Exercise> {
    if pool.len() <= target {
        return pool;
    }
    // Fisher-Yates, then keep the first `target`.
    for i in (1..pool.len()).rev() {
        let j = rng.gen_range(0..=i);
        pool.swap(i, j);
    }
    pool.truncate(target);
    pool
}
