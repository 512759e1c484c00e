// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Classifies one recording with a trained checkpoint:
//
//   Step 1: Rebuild the model from train_config.json   (Layer 6)
//   Step 2: Load the latest weights                    (Layer 6)
//   Step 3: Decode, resample, transform, classify      (Layer 5)

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::{Inferencer, Prediction};

pub struct PredictUseCase {
    inferencer: Inferencer,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: impl Into<PathBuf>) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(checkpoint_dir);
        let inferencer   = Inferencer::from_checkpoint(&ckpt_manager)?;
        Ok(Self { inferencer })
    }

    pub fn classify(&self, file: &Path) -> Result<Prediction> {
        if !file.is_file() {
            bail!("'{}' is not a file", file.display());
        }
        let prediction = self.inferencer.predict(file)?;
        tracing::info!(
            "'{}' → {} ({:.1}%)",
            file.display(),
            prediction.emotion,
            prediction.confidence * 100.0
        );
        Ok(prediction)
    }
}
