// ============================================================
// Layer 4 — Label / File Catalog
// ============================================================
// Finds the corpus files and turns their names into labels.
//
//   scan()        → every "*.wav" file in a flat directory,
//                   sorted lexicographically
//   parse_label() → filename character 5 → class index
//   split()       → deterministic prefix / suffix split
//
// Why no shuffling before the split?
//   EMO-DB filenames start with the speaker id, so the sorted
//   order groups recordings by speaker. A prefix split keeps the
//   partition reproducible run to run: the same directory and
//   ratio always give the same train and test files.
//
// Reference: Rust Book §8 (Vectors), §9 (Error Handling)

use std::{fs, path::Path};

use crate::domain::emotion::EMOTION_MAP;
use crate::domain::error::DataError;
use crate::domain::labeled_file::LabeledFile;

/// Only files with this suffix belong to the corpus
pub const AUDIO_EXTENSION: &str = ".wav";

/// 0-based character position of the emotion code in a filename
pub const LABEL_POSITION: usize = 5;

/// List the audio files in `dir`, sorted for determinism.
///
/// Sub-directories and non-UTF-8 names are ignored.
pub fn scan(dir: &Path) -> Result<Vec<String>, DataError> {
    let entries = fs::read_dir(dir).map_err(|e| DataError::io(dir.display().to_string(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::io(dir.display().to_string(), e))?;

        let is_file = entry
            .file_type()
            .map(|t| t.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) if name.ends_with(AUDIO_EXTENSION) => files.push(name),
            Ok(_) => {}
            Err(name) => {
                tracing::warn!("Skipping non UTF-8 filename {:?}", name);
            }
        }
    }

    files.sort();
    tracing::debug!("Found {} audio files in '{}'", files.len(), dir.display());
    Ok(files)
}

/// Read the emotion code at position 5 and map it to a class index.
///
/// Unknown codes are an error rather than a missing label, so a
/// mislabelled file can never reach the loss computation.
pub fn parse_label(file_name: &str) -> Result<usize, DataError> {
    parse_code(file_name).map(|(_, index)| index)
}

fn parse_code(file_name: &str) -> Result<(char, usize), DataError> {
    let code = file_name
        .chars()
        .nth(LABEL_POSITION)
        .ok_or_else(|| DataError::MissingLabel { file: file_name.to_string() })?;

    let index = EMOTION_MAP
        .index_of(code)
        .ok_or_else(|| DataError::UnknownLabel { file: file_name.to_string(), code })?;

    Ok((code, index))
}

/// Split a sorted list at `floor(len * ratio)`.
///
/// The first part is the training set, the remainder the test set.
/// A ratio of 0.0 gives an empty training set, 1.0 an empty test set.
/// Ratios outside [0, 1] are clamped.
pub fn split<T>(mut files: Vec<T>, ratio: f64) -> (Vec<T>, Vec<T>) {
    let total  = files.len();
    let ratio  = ratio.clamp(0.0, 1.0);
    let cutoff = ((total as f64 * ratio).floor() as usize).min(total);

    // split_off(n) keeps [0..n) in `files` and returns [n..total)
    let test = files.split_off(cutoff);

    tracing::debug!(
        "Catalog split: {} train, {} test (ratio {:.2})",
        files.len(),
        test.len(),
        ratio,
    );

    (files, test)
}

/// Parse every filename and attach its full path.
/// Fails on the first file whose label cannot be parsed.
pub fn label_files(dir: &Path, names: &[String]) -> Result<Vec<LabeledFile>, DataError> {
    names
        .iter()
        .map(|name| {
            let (code, class_index) = parse_code(name)?;
            Ok(LabeledFile::new(dir.join(name), code, class_index))
        })
        .collect()
}
