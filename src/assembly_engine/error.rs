use thiserror::Error;

/// Opaque backend failure reported by a [`ContentStore`] implementation.
///
/// The engine does not translate or retry these; they surface to the caller
/// as-is.
///
/// [`ContentStore`]: crate::assembly_engine::store::ContentStore
#[derive(Debug, Error)]
#[error("store backend error: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError { message: message.into() }
    }
}

/// Terminal failures of the assembly pipeline.
///
/// Locally-recovered anomalies (malformed matching groups, unknown type
/// names) never appear here — they are absorbed by dropping the offending
/// item or tagging it `UNKNOWN`.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The lesson identifier failed to parse or did not resolve.
    #[error("lesson not found: {0}")]
    LessonNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
