// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Model, training loop and inference. The data layer also
// speaks Burn (Dataset, Batcher, DataLoader) but everything
// that owns parameters or gradients lives here.
//
// What's in this layer:
//
//   model.rs      — 1-D CNN emotion classifier
//                   • two conv + ReLU blocks with a max-pool between
//                   • global max over time (any input length)
//                   • linear head to the 7 emotion classes
//
//   traits.rs     — ClassificationModel: training_step,
//                   validation_step, configure_optimizers
//
//   accuracy.rs   — Macro (class-averaged) accuracy
//
//   trainer.rs    — The training loop
//                   Forward pass, loss, backward pass, Adam step,
//                   validation, metrics and a checkpoint per epoch
//
//   inferencer.rs — Loads a checkpoint and classifies one WAV file
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// 1-D CNN emotion classifier
pub mod model;

/// What the training loop needs from a model
pub mod traits;

/// Macro accuracy over class indices
pub mod accuracy;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and predicts an emotion
pub mod inferencer;
