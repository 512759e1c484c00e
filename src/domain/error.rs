// ============================================================
// Layer 3 — Data Error Taxonomy
// ============================================================
// Every failure the catalog, loader or assembler can raise.
// Each variant names the offending file (or transform) and the
// invariant it violated so a training run that aborts says why.
//
// DataError is Clone because it travels inside dataloader items
// across worker threads; underlying io / codec errors are kept
// as rendered strings for that reason.
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Error Handling)

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// The 6th filename character is not one of the EMO-DB codes
    #[error("unknown emotion code '{code}' in '{file}' (expected one of W, L, E, A, F, T, N at position 5)")]
    UnknownLabel { file: String, code: char },

    /// The filename is too short to carry an emotion code
    #[error("'{file}' has no emotion code: filenames need at least 6 characters")]
    MissingLabel { file: String },

    #[error("cannot decode '{file}': {reason}")]
    Decode { file: String, reason: String },

    #[error("cannot resample '{file}' from {from} Hz to {to} Hz: {reason}")]
    Resample { file: String, from: u32, to: u32, reason: String },

    #[error("transform '{transform}' failed: {reason}")]
    Transform { transform: String, reason: String },

    #[error("unknown transform '{name}' (available: {available})")]
    UnknownTransform { name: String, available: String },

    /// Samples in one batch disagree on their channel count
    #[error("channel mismatch in batch: '{file}' has {found} channels, expected {expected}")]
    ShapeMismatch { file: String, expected: usize, found: usize },

    #[error("cannot assemble a batch from zero samples")]
    EmptyBatch,

    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("data module used before setup()")]
    NotSetUp,
}

impl DataError {
    pub fn io(path: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io { path: path.into(), reason: err.to_string() }
    }
}
