// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the training loop and the
// prediction path:
//
//   checkpoint.rs — Saving and loading model weights
//                   Uses Burn's CompactRecorder to serialise
//                   classifier parameters to disk. Also saves and
//                   loads TrainConfig as JSON so prediction can
//                   rebuild the model with the same transform.
//
//   metrics.rs    — Metric sink and CSV log
//                   Averages train_loss / train_acc / val_loss /
//                   val_acc over an epoch and appends them to
//                   metrics.csv.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Epoch metric accumulation and CSV logging
pub mod metrics;
