// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Rebuilds the classifier from train_config.json, loads the
// latest checkpoint and classifies single WAV files with the
// same loader + transform used during training.
use anyhow::{Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, NdArray},
    prelude::*,
    tensor::activation::softmax,
};
use std::{path::Path, sync::Arc};

use crate::data::{batcher::MIN_FRAMES, dataset::load_features, transform::TransformRegistry};
use crate::domain::{
    emotion::{Emotion, EMOTION_MAP},
    traits::Transform,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{EmotionClassifier, EmotionClassifierConfig};

type InferBackend = NdArray;

/// Most likely emotion plus the full softmax distribution
#[derive(Debug, Clone)]
pub struct Prediction {
    pub emotion:       Emotion,
    pub confidence:    f32,
    pub probabilities: Vec<(Emotion, f32)>,
}

pub struct Inferencer {
    model:       EmotionClassifier<InferBackend>,
    transform:   Arc<dyn Transform>,
    sample_rate: u32,
    device:      NdArrayDevice,
}

impl Inferencer {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = NdArrayDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        let registry  = TransformRegistry::install(cfg.sample_rate_target, cfg.n_mfcc)?;
        let transform = registry.get(&cfg.transform)?;
        let input_channels = cfg.resolve_input_channels(transform.output_channels())?;

        let model_cfg = EmotionClassifierConfig::new()
            .with_n_classes(cfg.n_classes)
            .with_input_channels(input_channels)
            .with_learning_rate(cfg.learning_rate);
        let model: EmotionClassifier<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint (transform '{}')", transform.name());

        Ok(Self { model, transform, sample_rate: registry.sample_rate(), device })
    }

    pub fn predict(&self, path: &Path) -> Result<Prediction> {
        let features = load_features(path, self.transform.as_ref(), self.sample_rate)
            .with_context(|| format!("Cannot prepare '{}' for prediction", path.display()))?;

        let frames = features.frames().max(MIN_FRAMES);
        let mut flat = Vec::with_capacity(features.channels() * frames);
        features.extend_padded(frames, &mut flat);

        let x = Tensor::<InferBackend, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([1, features.channels(), frames]);

        let logits = self.model.forward(x);
        let probs: Vec<f32> = softmax(logits, 1)
            .into_data()
            .iter::<f32>()
            .collect();

        // Indices past the emotion table are spare classifier outputs
        let mut probabilities: Vec<(Emotion, f32)> = probs
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| EMOTION_MAP.emotion_at(i).map(|e| (e, p)))
            .collect();

        let (emotion, confidence) = probabilities
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .context("Model produced no class scores")?;

        probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(Prediction { emotion, confidence, probabilities })
    }
}
