use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        loss::CrossEntropyLossConfig,
        pool::{MaxPool1d, MaxPool1dConfig},
        Linear, LinearConfig, PaddingConfig1d,
    },
    optim::AdamConfig,
    prelude::*,
    tensor::activation::relu,
};

use crate::data::batcher::EmoBatch;
use crate::domain::metric::MetricKey;
use crate::domain::traits::MetricSink;
use crate::ml::accuracy::batch_macro_accuracy;
use crate::ml::traits::{ClassificationModel, OptimizerSetup};

const CONV1_CHANNELS: usize = 16;
const CONV2_CHANNELS: usize = 32;
const KERNEL_SIZE: usize = 3;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct EmotionClassifierConfig {
    #[config(default = 7)]
    pub n_classes: usize,
    /// 1 for raw waveforms, n_mfcc for MFCC features
    #[config(default = 1)]
    pub input_channels: usize,
    #[config(default = 1e-3)]
    pub learning_rate: f64,
}

impl EmotionClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EmotionClassifier<B> {
        let conv1 = Conv1dConfig::new(self.input_channels, CONV1_CHANNELS, KERNEL_SIZE)
            .with_padding(PaddingConfig1d::Explicit(1))
            .init(device);
        let pool = MaxPool1dConfig::new(2).with_stride(2).init();
        let conv2 = Conv1dConfig::new(CONV1_CHANNELS, CONV2_CHANNELS, KERNEL_SIZE)
            .with_padding(PaddingConfig1d::Explicit(1))
            .init(device);
        let classifier = LinearConfig::new(CONV2_CHANNELS, self.n_classes).init(device);
        EmotionClassifier {
            conv1, pool, conv2, classifier,
            n_classes:     self.n_classes,
            learning_rate: self.learning_rate,
        }
    }
}

/// 1-D CNN over [batch, channels, time]:
/// conv(C→16) → ReLU → max-pool/2 → conv(16→32) → ReLU → max over time → linear(32→n_classes)
#[derive(Module, Debug)]
pub struct EmotionClassifier<B: Backend> {
    pub conv1:         Conv1d<B>,
    pub pool:          MaxPool1d,
    pub conv2:         Conv1d<B>,
    pub classifier:    Linear<B>,
    pub n_classes:     usize,
    pub learning_rate: f64,
}

impl<B: Backend> EmotionClassifier<B> {
    /// x: [batch, channels, time] → logits: [batch, n_classes]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = relu(self.conv1.forward(x));
        let x = self.pool.forward(x);
        let x = relu(self.conv2.forward(x));

        // Global max over time makes the head independent of T
        let x = x.max_dim(2); // [batch, 32, 1]
        let x = x.flatten::<2>(1, 2);

        self.classifier.forward(x)
    }

    /// Cross-entropy loss and macro accuracy for one batch
    fn loss_and_accuracy(&self, batch: EmoBatch<B>) -> (Tensor<B, 1>, f64) {
        let logits = self.forward(batch.x);
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), batch.y.clone());
        let acc = batch_macro_accuracy(logits, batch.y, self.n_classes);
        (loss, acc)
    }
}

impl<B: Backend> ClassificationModel<B> for EmotionClassifier<B> {
    fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        EmotionClassifier::forward(self, x)
    }

    fn training_step(&self, batch: EmoBatch<B>, sink: &mut dyn MetricSink) -> Tensor<B, 1> {
        let (loss, acc) = self.loss_and_accuracy(batch);
        sink.log(MetricKey::TrainLoss, loss.clone().into_scalar().elem::<f64>());
        sink.log(MetricKey::TrainAcc, acc);
        loss
    }

    fn validation_step(&self, batch: EmoBatch<B>, sink: &mut dyn MetricSink) {
        let (loss, acc) = self.loss_and_accuracy(batch);
        sink.log(MetricKey::ValLoss, loss.into_scalar().elem::<f64>());
        sink.log(MetricKey::ValAcc, acc);
    }

    fn configure_optimizers(&self) -> OptimizerSetup {
        OptimizerSetup { adam: AdamConfig::new(), learning_rate: self.learning_rate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};
    use burn::optim::{GradientsParams, Optimizer};
    use burn::tensor::Distribution;
    use std::collections::BTreeMap;

    type TestBackend = NdArray;
    type TestAutodiffBackend = Autodiff<NdArray>;

    fn all_finite<B: Backend, const D: usize>(t: Tensor<B, D>) -> bool {
        t.into_data().iter::<f32>().all(|v| v.is_finite())
    }

    #[test]
    fn test_forward_raw_waveform() {
        let device = Default::default();
        let model: EmotionClassifier<TestBackend> = EmotionClassifierConfig::new()
            .with_n_classes(7)
            .with_input_channels(1)
            .init(&device);

        let x = Tensor::<TestBackend, 3>::random([2, 1, 16_000], Distribution::Normal(0.0, 1.0), &device);
        let logits = model.forward(x);

        assert_eq!(logits.dims(), [2, 7]);
        assert!(all_finite(logits));
    }

    #[test]
    fn test_forward_on_single_frame_mfcc_batch() {
        use crate::data::batcher::pad_collate;
        use crate::data::dataset::EmoSample;
        use crate::data::fixtures::random_audio;
        use crate::data::mfcc::Mfcc;
        use crate::domain::traits::Transform;

        let device = Default::default();
        let features = Mfcc::new(16_000, 40).unwrap().apply(&random_audio(100)).unwrap();
        assert_eq!(features.frames(), 1);

        let sample = EmoSample { source: "tiny.wav".to_string(), features, label: 3 };
        let batch = pad_collate::<TestBackend>(vec![sample], &device).unwrap();

        let model: EmotionClassifier<TestBackend> = EmotionClassifierConfig::new()
            .with_input_channels(40)
            .init(&device);
        let logits = model.forward(batch.x);

        assert_eq!(logits.dims(), [1, 7]);
        assert!(all_finite(logits));
    }

    #[test]
    fn test_forward_is_time_length_polymorphic() {
        let device = Default::default();
        let model: EmotionClassifier<TestBackend> = EmotionClassifierConfig::new()
            .with_input_channels(40)
            .init(&device);

        for t in [2, 101, 333] {
            let x = Tensor::<TestBackend, 3>::random([3, 40, t], Distribution::Default, &device);
            assert_eq!(model.forward(x).dims(), [3, 7]);
        }
    }

    #[test]
    fn test_training_step_returns_finite_scalar_loss() {
        let device = Default::default();
        let model: EmotionClassifier<TestBackend> = EmotionClassifierConfig::new().init(&device);

        let batch = EmoBatch {
            x: Tensor::random([2, 1, 16_000], Distribution::Normal(0.0, 1.0), &device),
            y: Tensor::<TestBackend, 1, Int>::zeros([2], &device),
        };

        let mut sink: BTreeMap<MetricKey, f64> = BTreeMap::new();
        let loss = model.training_step(batch, &mut sink);
        assert_eq!(loss.dims(), [1]);

        let value = loss.into_scalar().elem::<f64>();
        assert!(value.is_finite());
        assert!(value >= 0.0);

        assert_eq!(sink.get(&MetricKey::TrainLoss).copied(), Some(value));
        let acc = sink[&MetricKey::TrainAcc];
        assert!((0.0..=1.0).contains(&acc));
        assert!(!sink.contains_key(&MetricKey::ValLoss));
    }

    #[test]
    fn test_validation_step_reports_val_metrics() {
        let device = Default::default();
        let model: EmotionClassifier<TestBackend> = EmotionClassifierConfig::new().init(&device);

        let batch = EmoBatch {
            x: Tensor::random([4, 1, 800], Distribution::Default, &device),
            y: Tensor::<TestBackend, 1, Int>::from_ints([0, 3, 5, 6], &device),
        };

        let mut sink: BTreeMap<MetricKey, f64> = BTreeMap::new();
        model.validation_step(batch, &mut sink);
        assert!(sink[&MetricKey::ValLoss].is_finite());
        assert!(sink.contains_key(&MetricKey::ValAcc));
        assert!(!sink.contains_key(&MetricKey::TrainLoss));
    }

    #[test]
    fn test_configure_optimizers_uses_learning_rate() {
        let device = Default::default();
        let model: EmotionClassifier<TestBackend> = EmotionClassifierConfig::new()
            .with_learning_rate(5e-4)
            .init(&device);
        assert_eq!(model.configure_optimizers().learning_rate, 5e-4);
    }

    #[test]
    fn test_optimizer_step_keeps_model_finite() {
        let device = Default::default();
        let mut model: EmotionClassifier<TestAutodiffBackend> = EmotionClassifierConfig::new().init(&device);
        let setup = model.configure_optimizers();
        let mut optim = setup.adam.init();

        let x = Tensor::<TestAutodiffBackend, 3>::random([2, 1, 4_000], Distribution::Normal(0.0, 1.0), &device);
        let batch = EmoBatch { x: x.clone(), y: Tensor::from_ints([1, 4], &device) };

        let loss  = model.training_step(batch, &mut BTreeMap::<MetricKey, f64>::new());
        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(setup.learning_rate, model, grads);

        assert!(all_finite(model.forward(x)));
    }
}
