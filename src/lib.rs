//! # exercise_assembler
//!
//! The assembly engine behind a language-learning exercise service: given a
//! read-only content store, it selects a set of exercises matching a
//! lesson/duration request, reconstructs composite "matching" exercises from
//! their parent/child records, and renders everything into strongly-typed,
//! client-ready content objects.
//!
//! ## How it works
//!
//! 1. Implement [`ContentStore`] over your catalog (or use [`MemoryStore`]).
//! 2. Build a [`SessionRequest`] with a lesson id, target duration, and the
//!    exercise type names to draw from.
//! 3. Call [`assemble_session`] — the engine estimates how many exercises
//!    the duration needs, samples the eligible pool, regroups matching-type
//!    children under their parents with shuffled, labelled left/right sides
//!    and a bijective answer map, and formats every exercise into its
//!    type-specific content shape.
//! 4. The returned [`SessionResponse`] carries the phase/topic context and
//!    the ordered exercise list, each record tagged with its type name for
//!    client-side discrimination.
//!
//! ## Key properties
//!
//! - **Deterministic shuffles**: a matching parent carrying a `seed`
//!   attribute reproduces the exact same left/right layout and answer map
//!   every time; `SessionRequest::rng_seed` does the same for sampling.
//! - **Bijective answer maps**: every reconstructed group of `n` pairs maps
//!   its `n` left labels onto its `n` right labels one-to-one.
//! - **Total formatting**: a missing optional attribute never aborts a
//!   batch; malformed matching groups are dropped individually and unknown
//!   type names pass through tagged `UNKNOWN`.
//!
//! ## Quick start
//!
//! ```rust
//! use exercise_assembler::{
//!     assemble_session, MediaConfig, MemoryStore, SessionOutcome, SessionRequest,
//! };
//!
//! let store = MemoryStore::new();
//! let request = SessionRequest::new(
//!     "a0a0a0a0-0000-4000-8000-000000000001",
//!     300,
//!     vec!["LISTEN_IMAGE_TRUE_FALSE".into(), "READ_WORD_ORDER".into()],
//! );
//! let media = MediaConfig::new("/media");
//!
//! match assemble_session(&store, &request, &media, None) {
//!     Ok(SessionOutcome::Session(resp)) => println!("{} exercises", resp.count),
//!     Ok(SessionOutcome::InsufficientContent) => println!("no material"),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

pub mod assembly_engine;

// Convenience re-exports so callers can use `exercise_assembler::assemble_session`
// directly without reaching into `assembly_engine::`.
pub use assembly_engine::{
    assemble_session, AssemblyError, ContentStore, CorrectAnswer, Exercise,
    ExerciseContent, ExerciseKind, FormattedExercise, LessonContext, MediaAsset,
    MediaConfig, MediaLink, MemoryStore, ParentGroup, SessionOutcome, SessionRequest,
    SessionResponse, StoreError, Word,
};
