//! Error taxonomy for the rhyme-tagging engine (see SPEC_FULL.md §7).

use thiserror::Error;

/// All ways a `RhymeEngine` operation can fail.
#[derive(Debug, Error)]
pub enum RhymeError {
    /// Invalid settings passed to `new_model`/`Settings::validate`.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// `train_model` was called before any poem was ingested.
    #[error("train_model called with an empty corpus; add_to_model at least one poem first")]
    EmptyCorpus,

    /// `tag` was called before a model was trained or loaded.
    #[error("no model loaded; call load_model() or train_model() first")]
    UnloadedModel,

    /// The external IPA transcriber failed or returned something unusable.
    #[error("transcriber error: {0}")]
    Transcriber(String),

    /// A persisted model's JSON was well-formed but a key inside it wasn't.
    #[error("failed to parse model key {key:?}: {reason}")]
    ModelParse { key: String, reason: String },

    /// File I/O during save_model/load_model.
    #[error("model I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure not already classified as `ModelParse`.
    #[error("model JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RhymeError>;
