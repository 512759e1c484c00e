// ============================================================
// Layer 3 — LabeledFile Domain Type
// ============================================================
// One audio file from the corpus together with the class index
// parsed from its name. Created when the catalog is scanned and
// never changed afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledFile {
    /// Full path to the WAV file
    pub path: PathBuf,

    /// The EMO-DB code letter found at position 5 of the filename
    pub emotion_code: char,

    /// Class index derived from `emotion_code` via the label map
    pub class_index: usize,
}

impl LabeledFile {
    pub fn new(path: impl Into<PathBuf>, emotion_code: char, class_index: usize) -> Self {
        Self { path: path.into(), emotion_code, class_index }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bare filename, used to identify the file in errors and logs
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
