// ============================================================
// Layer 4 — Padding Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec of decoded
// samples into tensors the classifier can consume.
//
// How batching works here:
//   Input:  N samples, each [C, T_i] with its own length T_i
//   Output: EmoBatch with x: [N, C, max(T_i)] and y: [N]
//
//   Each sample is right-padded with zeros on the time axis up
//   to the longest sample in THIS batch, so the padded length
//   changes from batch to batch. The classifier ends with a
//   global max-pool over time, so any length works.
//
//   Sample order is preserved: row i of x and y come from
//   items[i]. Nothing is sorted by length.
//
// Preconditions checked explicitly:
//   • at least one sample
//   • every sample has the same channel count as the first
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::{EmoSample, SampleResult};
use crate::domain::error::DataError;

// ─── EmoBatch ─────────────────────────────────────────────────────────────────
/// A padded batch ready for the forward pass.
#[derive(Debug, Clone)]
pub struct EmoBatch<B: Backend> {
    /// Features — shape: [batch_size, channels, max_time]
    pub x: Tensor<B, 3>,

    /// Class indices — shape: [batch_size]
    pub y: Tensor<B, 1, Int>,
}

/// Shortest time axis a batch is padded to. The classifier's
/// stride-2 max-pool needs at least two frames.
pub const MIN_FRAMES: usize = 2;

/// Batcher output: any failed item aborts the whole batch
pub type BatchResult<B> = Result<EmoBatch<B>, DataError>;

/// Pad and stack `samples` into one batch on `device`.
pub fn pad_collate<B: Backend>(samples: Vec<EmoSample>, device: &B::Device) -> BatchResult<B> {
    let first = samples.first().ok_or(DataError::EmptyBatch)?;
    let channels = first.features.channels();

    if let Some(odd) = samples.iter().find(|s| s.features.channels() != channels) {
        return Err(DataError::ShapeMismatch {
            file:     odd.source.clone(),
            expected: channels,
            found:    odd.features.channels(),
        });
    }

    let batch_size = samples.len();
    let max_len = samples
        .iter()
        .map(|s| s.features.frames())
        .max()
        .unwrap_or(0)
        .max(MIN_FRAMES);

    // ── Flatten padded features ───────────────────────────────────────────────
    // Row-major [N, C, T]: sample by sample, channel by channel
    let mut flat: Vec<f32> = Vec::with_capacity(batch_size * channels * max_len);
    for s in &samples {
        s.features.extend_padded(max_len, &mut flat);
    }

    // ── Collect labels in input order ─────────────────────────────────────────
    let labels: Vec<i32> = samples.iter().map(|s| s.label as i32).collect();

    let x = Tensor::<B, 1>::from_floats(flat.as_slice(), device)
        .reshape([batch_size, channels, max_len]);
    let y = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), device);

    Ok(EmoBatch { x, y })
}

// ─── PadBatcher ───────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the
/// correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct PadBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PadBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// The DataLoader calls .batch(items) from its worker threads.
impl<B: Backend> Batcher<SampleResult, BatchResult<B>> for PadBatcher<B> {
    fn batch(&self, items: Vec<SampleResult>) -> BatchResult<B> {
        let samples = items.into_iter().collect::<Result<Vec<_>, _>>()?;
        pad_collate(samples, &self.device)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::Features;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn sample(name: &str, channels: usize, frames: usize, fill: f32, label: usize) -> EmoSample {
        EmoSample {
            source:   name.to_string(),
            features: Features::new(channels, frames, vec![fill; channels * frames]).unwrap(),
            label,
        }
    }

    #[test]
    fn test_pads_to_longest_sample() {
        let device = Default::default();
        let batch = pad_collate::<TestBackend>(
            vec![sample("a", 2, 3, 1.0, 0), sample("b", 2, 5, 2.0, 4)],
            &device,
        )
        .unwrap();

        assert_eq!(batch.x.dims(), [2, 2, 5]);
        assert_eq!(batch.y.dims(), [2]);

        let x: Vec<f32> = batch.x.into_data().iter::<f32>().collect();
        // First sample, first channel: three ones then two zeros of padding
        assert_eq!(&x[0..5], &[1.0, 1.0, 1.0, 0.0, 0.0]);
        // Second sample is not padded
        assert!(x[10..20].iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_preserves_input_order() {
        let device = Default::default();
        let batch = pad_collate::<TestBackend>(
            vec![sample("a", 1, 4, 0.0, 5), sample("b", 1, 2, 0.0, 1), sample("c", 1, 9, 0.0, 3)],
            &device,
        )
        .unwrap();

        let y: Vec<i64> = batch.y.into_data().iter::<i64>().collect();
        assert_eq!(y, vec![5, 1, 3]);
        assert_eq!(batch.x.dims(), [3, 1, 9]);
    }

    #[test]
    fn test_padding_keeps_values_finite() {
        let device = Default::default();
        let batch = pad_collate::<TestBackend>(
            vec![sample("a", 1, 100, 0.5, 0), sample("b", 1, 1, -0.5, 1)],
            &device,
        )
        .unwrap();
        assert!(batch.x.into_data().iter::<f32>().all(|v| v.is_finite()));
    }

    #[test]
    fn test_single_frame_batch_is_padded_to_min_frames() {
        let device = Default::default();
        let batch = pad_collate::<TestBackend>(vec![sample("short", 40, 1, 0.75, 2)], &device).unwrap();

        assert_eq!(batch.x.dims(), [1, 40, MIN_FRAMES]);
        let x: Vec<f32> = batch.x.into_data().iter::<f32>().collect();
        // Each channel row: the real frame then zero padding
        assert_eq!(&x[0..2], &[0.75, 0.0]);
        assert_eq!(&x[78..80], &[0.75, 0.0]);
    }

    #[test]
    fn test_channel_mismatch_is_rejected() {
        let device = Default::default();
        let err = pad_collate::<TestBackend>(
            vec![sample("a", 1, 4, 0.0, 0), sample("b", 40, 4, 0.0, 0)],
            &device,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DataError::ShapeMismatch { file: "b".to_string(), expected: 1, found: 40 }
        );
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let device = Default::default();
        assert_eq!(pad_collate::<TestBackend>(vec![], &device).unwrap_err(), DataError::EmptyBatch);
    }

    #[test]
    fn test_failed_item_fails_the_batch() {
        let batcher = PadBatcher::<TestBackend>::new(Default::default());
        let items = vec![
            Ok(sample("a", 1, 4, 0.0, 0)),
            Err(DataError::Decode { file: "b.wav".to_string(), reason: "truncated".to_string() }),
        ];
        assert!(matches!(batcher.batch(items), Err(DataError::Decode { .. })));
    }
}
