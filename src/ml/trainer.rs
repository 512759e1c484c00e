// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop driven by a DataModule and a ClassificationModel.
//
// Key Burn insight:
//   - Training uses an AutodiffBackend so loss.backward() works
//   - model.valid() returns the model on B::InnerBackend
//   - The validation loader must also be built on B::InnerBackend
//   - Both backends share the same device type
//
// Every step reports into an EpochAccumulator (a MetricSink);
// the epoch means are printed, appended to metrics.csv and a
// checkpoint is written after each epoch.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::{BackendKind, TrainConfig};
use crate::data::datamodule::DataModule;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochAccumulator, EpochMetrics, MetricsLogger},
};
use crate::ml::model::{EmotionClassifier, EmotionClassifierConfig};
use crate::ml::traits::ClassificationModel;

/// Pick the backend named in the config and run the loop on it
pub fn run_training<D: DataModule>(
    cfg:          &TrainConfig,
    datamodule:   &D,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
) -> Result<()> {
    // The transform decides the channel count; TrainUseCase resolves it
    let input_channels = cfg
        .input_channels
        .context("input_channels must be resolved from the transform before training")?;

    match cfg.backend {
        BackendKind::Ndarray => {
            let device = NdArrayDevice::default();
            tracing::info!("Using NdArray device: {:?}", device);
            train_loop::<Autodiff<NdArray>, D>(cfg, input_channels, datamodule, ckpt_manager, metrics, device)?;
        }
        BackendKind::Wgpu => {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train_loop::<Autodiff<Wgpu>, D>(cfg, input_channels, datamodule, ckpt_manager, metrics, device)?;
        }
    }
    Ok(())
}

pub fn train_loop<B: AutodiffBackend, D: DataModule>(
    cfg:            &TrainConfig,
    input_channels: usize,
    datamodule:   &D,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       B::Device,
) -> Result<EmotionClassifier<B>> {

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = EmotionClassifierConfig::new()
        .with_n_classes(cfg.n_classes)
        .with_input_channels(input_channels)
        .with_learning_rate(cfg.learning_rate);
    let mut model: EmotionClassifier<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} input channel(s), {} classes",
        input_channels, cfg.n_classes
    );

    // ── Optimiser from the model ──────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let setup = model.configure_optimizers();
    let mut optim = setup.adam.init::<B, EmotionClassifier<B>>();

    // ── Loaders: train on B, validation on B::InnerBackend ────────────────────
    let train_loader = datamodule.train_dataloader::<B>(&device)?;
    let val_loader   = datamodule.val_dataloader::<B::InnerBackend>(&device)?;

    let mut best_val_loss = f64::INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut acc = EpochAccumulator::new();

        // ── Training phase ────────────────────────────────────────────────────
        for batch in train_loader.iter() {
            let batch = batch
                .inspect_err(|e| tracing::warn!("Aborting epoch {}: {}", epoch, e))
                .with_context(|| format!("Training batch failed in epoch {epoch}"))?;
            let loss  = model.training_step(batch, &mut acc);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(setup.learning_rate, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        for batch in val_loader.iter() {
            let batch = batch
                .inspect_err(|e| tracing::warn!("Aborting validation in epoch {}: {}", epoch, e))
                .with_context(|| format!("Validation batch failed in epoch {epoch}"))?;
            model_valid.validation_step(batch, &mut acc);
        }

        let row = EpochMetrics::from_accumulator(epoch, &acc);
        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.1}% | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs,
            row.train_loss, row.train_acc * 100.0,
            row.val_loss,   row.val_acc * 100.0,
        );
        metrics.log(&row)?;

        if row.is_improvement(best_val_loss) {
            best_val_loss = row.val_loss;
            tracing::info!("New best val_loss {:.4} at epoch {}", best_val_loss, epoch);
        }

        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(model)
}
