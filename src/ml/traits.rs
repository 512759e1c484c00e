// ============================================================
// Layer 5 — Model Capability
// ============================================================
// What the training loop needs from a classifier:
//
//   forward()              → logits [batch, n_classes]
//   training_step()        → loss to back-propagate; reports
//                            train_loss / train_acc to the sink
//   validation_step()      → reports val_loss / val_acc only
//   configure_optimizers() → optimiser + learning rate to use
//
// The loop itself stays generic over this trait.

use burn::{optim::AdamConfig, prelude::*};

use crate::data::batcher::EmoBatch;
use crate::domain::traits::MetricSink;

/// Optimiser choice returned by `configure_optimizers`
#[derive(Clone)]
pub struct OptimizerSetup {
    pub adam:          AdamConfig,
    pub learning_rate: f64,
}

pub trait ClassificationModel<B: Backend> {
    fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2>;

    fn training_step(&self, batch: EmoBatch<B>, sink: &mut dyn MetricSink) -> Tensor<B, 1>;

    fn validation_step(&self, batch: EmoBatch<B>, sink: &mut dyn MetricSink);

    fn configure_optimizers(&self) -> OptimizerSetup;
}
