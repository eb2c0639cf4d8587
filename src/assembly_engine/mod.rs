//! Core assembly engine — candidate selection, matching reconstruction, and
//! polymorphic formatting.
//!
//! ## Module overview
//!
//! | Module          | Purpose |
//! |-----------------|---------|
//! | `models`        | Content entities, exercise kinds, request/response envelope |
//! | `error`         | Error taxonomy: lesson-not-found, opaque store failures |
//! | `store`         | `ContentStore` read trait + in-memory reference backend |
//! | `helpers`       | Seeded RNG factory, Fisher-Yates index shuffle, A.. labels |
//! | `media`         | Media URL normalization against an explicit config |
//! | `selector`      | Duration table, target count, uniform candidate sampling |
//! | `reconstructor` | Parent/child regrouping with bijective answer maps |
//! | `formats`       | Type-dispatched formatting into client content shapes |
//! | `assembler`     | Single entry point `assemble_session()` |

pub mod assembler;
pub mod error;
pub mod formats;
pub mod helpers;
pub mod media;
pub mod models;
pub mod reconstructor;
pub mod selector;
pub mod store;

// Re-export the public API surface so callers can use
// `assembly_engine::assemble_session` without reaching into sub-modules.
pub use assembler::assemble_session;
pub use error::{AssemblyError, StoreError};
pub use formats::{CorrectAnswer, ExerciseContent, FormattedExercise};
pub use media::MediaConfig;
pub use models::{
    Exercise, ExerciseKind, LessonContext, MediaAsset, MediaLink, ParentGroup,
    SessionOutcome, SessionRequest, SessionResponse, Word,
};
pub use store::{ContentStore, MemoryStore};
