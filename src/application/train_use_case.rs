// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Validate the config
//   Step 2: Install the transform registry  (Layer 4 - data)
//   Step 3: Resolve the transform + channels (Layer 4 - data)
//   Step 4: Set up the data module          (Layer 4 - data)
//   Step 5: Save the resolved config        (Layer 6 - infra)
//   Step 6: Run the training loop           (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, str::FromStr};

use crate::data::{
    audio::TARGET_SAMPLE_RATE,
    datamodule::{DataModule, DataModuleConfig, EmoDataModule},
    mfcc::DEFAULT_N_MFCC,
    transform::TransformRegistry,
};
use crate::domain::emotion::EMOTION_MAP;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::trainer::run_training;

// ─── Backend Selection ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// CPU
    Ndarray,
    /// GPU through wgpu
    Wgpu,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ndarray" => Ok(Self::Ndarray),
            "wgpu"    => Ok(Self::Wgpu),
            other     => bail!("unknown backend '{other}' (expected 'ndarray' or 'wgpu')"),
        }
    }
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run.
// Serialisable so it can be saved next to the checkpoints and
// reloaded for prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:           String,
    pub checkpoint_dir:     String,
    pub batch_size:         usize,
    pub epochs:             usize,
    /// "raw" or "mfcc"
    pub transform:          String,
    pub split_ratio:        f64,
    pub sample_rate_target: u32,
    pub n_mfcc:             usize,
    pub n_classes:          usize,
    pub learning_rate:      f64,
    /// None means "whatever the transform emits"
    #[serde(default)]
    pub input_channels:     Option<usize>,
    pub worker_count:       usize,
    pub seed:               u64,
    pub backend:            BackendKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:           "data/emodb/wav".to_string(),
            checkpoint_dir:     "checkpoints".to_string(),
            batch_size:         32,
            epochs:             10,
            transform:          "raw".to_string(),
            split_ratio:        0.8,
            sample_rate_target: TARGET_SAMPLE_RATE,
            n_mfcc:             DEFAULT_N_MFCC,
            n_classes:          EMOTION_MAP.len(),
            learning_rate:      1e-3,
            input_channels:     None,
            worker_count:       19,
            seed:               42,
            backend:            BackendKind::Ndarray,
        }
    }
}

impl TrainConfig {
    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be positive");
        }
        if !(0.0..=1.0).contains(&self.split_ratio) {
            bail!("split_ratio must be in [0, 1], got {}", self.split_ratio);
        }
        if !(self.learning_rate > 0.0) {
            bail!("learning_rate must be positive, got {}", self.learning_rate);
        }
        if self.sample_rate_target == 0 {
            bail!("sample_rate_target must be positive");
        }
        if self.n_classes < EMOTION_MAP.len() {
            bail!(
                "n_classes = {} cannot hold the {} EMO-DB emotions",
                self.n_classes,
                EMOTION_MAP.len()
            );
        }
        if self.input_channels == Some(0) {
            bail!("input_channels must be positive");
        }
        Ok(())
    }

    /// Check `input_channels` against what the transform emits and
    /// return the channel count the model must be built with.
    pub fn resolve_input_channels(&self, transform_channels: usize) -> Result<usize> {
        match self.input_channels {
            None => Ok(transform_channels),
            Some(c) if c == transform_channels => Ok(c),
            Some(c) => bail!(
                "input_channels = {} but transform '{}' emits {} channel(s)",
                c, self.transform, transform_channels
            ),
        }
    }

    pub fn data_module_config(&self) -> DataModuleConfig {
        DataModuleConfig {
            data_dir:     PathBuf::from(&self.data_dir),
            batch_size:   self.batch_size,
            split_ratio:  self.split_ratio,
            sample_rate:  self.sample_rate_target,
            worker_count: self.worker_count,
            seed:         self.seed,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        // ── Step 1: Validate ──────────────────────────────────────────────────
        self.config.validate()?;
        let mut cfg = self.config.clone();

        // ── Step 2: Install the process-wide transform registry ───────────────
        let registry = TransformRegistry::install(cfg.sample_rate_target, cfg.n_mfcc)?;

        // ── Step 3: Resolve transform and model input channels ────────────────
        let transform = registry.get(&cfg.transform)?;
        cfg.input_channels = Some(cfg.resolve_input_channels(transform.output_channels())?);
        tracing::info!(
            "Transform '{}' → {} input channel(s)",
            transform.name(),
            transform.output_channels()
        );

        // ── Step 4: Data module ───────────────────────────────────────────────
        let mut datamodule = EmoDataModule::new(cfg.data_module_config(), transform);
        datamodule
            .setup()
            .with_context(|| format!("Cannot prepare corpus in '{}'", cfg.data_dir))?;

        // ── Step 5: Save config for prediction ────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(&cfg)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 6: Run training loop (Layer 5) ───────────────────────────────
        run_training(&cfg, &datamodule, &ckpt_manager, &metrics)?;

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = TrainConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.split_ratio, 0.8);
        assert_eq!(cfg.sample_rate_target, 16_000);
        assert_eq!(cfg.n_classes, 7);
        assert_eq!(cfg.worker_count, 19);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            TrainConfig { batch_size: 0, ..TrainConfig::default() },
            TrainConfig { split_ratio: 1.5, ..TrainConfig::default() },
            TrainConfig { learning_rate: 0.0, ..TrainConfig::default() },
            TrainConfig { learning_rate: f64::NAN, ..TrainConfig::default() },
            TrainConfig { n_classes: 3, ..TrainConfig::default() },
            TrainConfig { sample_rate_target: 0, ..TrainConfig::default() },
            TrainConfig { input_channels: Some(0), ..TrainConfig::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn test_input_channels_must_match_transform() {
        let cfg = TrainConfig { transform: "mfcc".to_string(), ..TrainConfig::default() };
        assert_eq!(cfg.resolve_input_channels(40).unwrap(), 40);

        let cfg = TrainConfig { input_channels: Some(1), ..cfg };
        assert!(cfg.resolve_input_channels(40).is_err());
        assert_eq!(cfg.resolve_input_channels(1).unwrap(), 1);
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("wgpu".parse::<BackendKind>().unwrap(), BackendKind::Wgpu);
        assert_eq!("ndarray".parse::<BackendKind>().unwrap(), BackendKind::Ndarray);
        assert!("cuda".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_unknown_transform_fails_execute() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            data_dir:       dir.path().display().to_string(),
            checkpoint_dir: dir.path().join("ckpt").display().to_string(),
            transform:      "spectrogram".to_string(),
            ..TrainConfig::default()
        };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
