// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, BackendKind, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{builder::PossibleValuesParser, Args, Subcommand};
use crate::application::train_use_case::{BackendKind, TrainConfig};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the emotion classifier on an EMO-DB wav directory
    Train(TrainArgs),

    /// Predict the emotion of one recording using a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing the EMO-DB .wav files
    #[arg(long, default_value = "data/emodb/wav")]
    pub data_dir: String,

    /// Directory to save checkpoints, config and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of utterances per batch
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Feature transform applied to each waveform
    #[arg(long, default_value = "raw", value_parser = PossibleValuesParser::new(["raw", "mfcc"]))]
    pub transform: String,

    /// Fraction of the sorted file list used for training
    #[arg(long, default_value_t = 0.8)]
    pub split_ratio: f64,

    /// Every file is resampled to this rate (Hz)
    #[arg(long, default_value_t = 16_000)]
    pub sample_rate: u32,

    /// Number of MFCC coefficients (only used by --transform mfcc)
    #[arg(long, default_value_t = 40)]
    pub n_mfcc: usize,

    /// Model input channels; defaults to what the transform emits
    #[arg(long)]
    pub input_channels: Option<usize>,

    /// Dataloader worker threads (0 = load on the training thread)
    #[arg(long, default_value_t = 19)]
    pub workers: usize,

    /// Seed for the training-set shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Compute backend: ndarray (CPU) or wgpu (GPU)
    #[arg(long, default_value = "ndarray")]
    pub backend: BackendKind,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:           a.data_dir,
            checkpoint_dir:     a.checkpoint_dir,
            batch_size:         a.batch_size,
            epochs:             a.epochs,
            learning_rate:      a.lr,
            transform:          a.transform,
            split_ratio:        a.split_ratio,
            sample_rate_target: a.sample_rate,
            n_mfcc:             a.n_mfcc,
            input_channels:     a.input_channels,
            worker_count:       a.workers,
            seed:               a.seed,
            backend:            a.backend,
            ..TrainConfig::default()
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// The .wav file to classify
    #[arg(long)]
    pub file: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use crate::application::train_use_case::{BackendKind, TrainConfig};
    use super::Commands;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["emodb-ser", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let default = TrainConfig::default();

        assert_eq!(cfg.data_dir, default.data_dir);
        assert_eq!(cfg.batch_size, default.batch_size);
        assert_eq!(cfg.split_ratio, default.split_ratio);
        assert_eq!(cfg.worker_count, default.worker_count);
        assert_eq!(cfg.transform, "raw");
        assert_eq!(cfg.backend, BackendKind::Ndarray);
        assert!(cfg.input_channels.is_none());
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from([
            "emodb-ser", "train", "--transform", "mfcc", "--n-mfcc", "13",
            "--backend", "wgpu", "--workers", "0",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.transform, "mfcc");
        assert_eq!(cfg.n_mfcc, 13);
        assert_eq!(cfg.backend, BackendKind::Wgpu);
        assert_eq!(cfg.worker_count, 0);
    }

    #[test]
    fn test_rejects_unknown_transform_and_backend() {
        assert!(Cli::try_parse_from(["emodb-ser", "train", "--transform", "stft"]).is_err());
        assert!(Cli::try_parse_from(["emodb-ser", "train", "--backend", "cuda"]).is_err());
        assert!(Cli::try_parse_from(["emodb-ser", "predict"]).is_err());
    }
}
