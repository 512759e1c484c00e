// ============================================================
// Layer 3 — Feature Matrix
// ============================================================
// A transform turns a mono waveform into a matrix of shape
// [channels, frames], stored row-major in a flat Vec<f32>:
//
//   raw  → [1, samples]        (the waveform itself)
//   mfcc → [n_mfcc, frames]    (one row per coefficient)
//
// The batch assembler right-pads the time axis (frames) with
// zeros; the channel axis is never padded.
//
// Reference: Rust Book §8 (Vectors)

use crate::domain::error::DataError;

#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    channels: usize,
    frames:   usize,
    values:   Vec<f32>,
}

impl Features {
    /// Wrap a row-major buffer. Fails if the buffer does not hold
    /// exactly `channels * frames` values.
    pub fn new(channels: usize, frames: usize, values: Vec<f32>) -> Result<Self, DataError> {
        if channels == 0 || values.len() != channels * frames {
            return Err(DataError::Transform {
                transform: "features".to_string(),
                reason: format!(
                    "buffer of {} values does not fit shape [{}, {}]",
                    values.len(), channels, frames
                ),
            });
        }
        Ok(Self { channels, frames, values })
    }

    /// A single-channel matrix holding the waveform unchanged
    pub fn mono(waveform: Vec<f32>) -> Self {
        let frames = waveform.len();
        Self { channels: 1, frames, values: waveform }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Length of the time axis
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn row(&self, channel: usize) -> &[f32] {
        let start = channel * self.frames;
        &self.values[start..start + self.frames]
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Append every row, right-padded with zeros to `frames`, onto `out`.
    /// Rows longer than `frames` are never truncated: callers pass the
    /// batch maximum.
    pub fn extend_padded(&self, frames: usize, out: &mut Vec<f32>) {
        let pad = frames.saturating_sub(self.frames);
        for c in 0..self.channels {
            out.extend_from_slice(self.row(c));
            out.extend(std::iter::repeat(0.0).take(pad));
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_must_match_buffer() {
        assert!(Features::new(2, 3, vec![0.0; 6]).is_ok());
        assert!(Features::new(2, 3, vec![0.0; 5]).is_err());
        assert!(Features::new(0, 0, vec![]).is_err());
    }

    #[test]
    fn test_rows_are_row_major() {
        let f = Features::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(f.row(0), &[1.0, 2.0]);
        assert_eq!(f.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_extend_padded_pads_each_row() {
        let f = Features::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut out = Vec::new();
        f.extend_padded(4, &mut out);
        assert_eq!(out, vec![1.0, 2.0, 0.0, 0.0, 3.0, 4.0, 0.0, 0.0]);
    }
}
