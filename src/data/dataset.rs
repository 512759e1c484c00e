use std::path::Path;
use std::sync::Arc;

use burn::data::dataset::Dataset;

use crate::data::{audio, catalog};
use crate::domain::error::DataError;
use crate::domain::features::Features;
use crate::domain::labeled_file::LabeledFile;
use crate::domain::traits::Transform;

/// One decoded utterance: features of shape [channels, time] plus
/// its class index. `source` names the file for error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct EmoSample {
    pub source:   String,
    pub features: Features,
    pub label:    usize,
}

/// Dataset item: a decode or transform failure travels with the
/// item so the training loop can report the offending file.
pub type SampleResult = Result<EmoSample, DataError>;

/// Decode, resample and transform one file.
pub fn load_features(path: &Path, transform: &dyn Transform, sample_rate: u32) -> Result<Features, DataError> {
    let (waveform, native_rate) = audio::load(path)?;
    let waveform = audio::resample(waveform, native_rate, sample_rate, &path.display().to_string())?;
    transform.apply(&waveform)
}

pub fn load_sample(file: &LabeledFile, transform: &dyn Transform, sample_rate: u32) -> SampleResult {
    let features = load_features(file.path(), transform, sample_rate)?;
    Ok(EmoSample { source: file.file_name(), features, label: file.class_index })
}

/// The labelled files of one split. Samples are decoded from disk
/// every time they are requested.
#[derive(Debug, Clone)]
pub struct EmoDbDataset {
    files:       Vec<LabeledFile>,
    transform:   Arc<dyn Transform>,
    sample_rate: u32,
}

impl EmoDbDataset {
    pub fn new(files: Vec<LabeledFile>, transform: Arc<dyn Transform>, sample_rate: u32) -> Self {
        Self { files, transform, sample_rate }
    }

    /// Every WAV file in `dir`, in sorted order
    pub fn from_dir(dir: &Path, transform: Arc<dyn Transform>, sample_rate: u32) -> Result<Self, DataError> {
        let names = catalog::scan(dir)?;
        let files = catalog::label_files(dir, &names)?;
        Ok(Self::new(files, transform, sample_rate))
    }

    pub fn files(&self) -> &[LabeledFile] {
        &self.files
    }
}

impl Dataset<SampleResult> for EmoDbDataset {
    fn get(&self, index: usize) -> Option<SampleResult> {
        self.files
            .get(index)
            .map(|file| load_sample(file, self.transform.as_ref(), self.sample_rate))
    }

    fn len(&self) -> usize {
        self.files.len()
    }
}
