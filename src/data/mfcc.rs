// ============================================================
// Layer 4 — MFCC Front End
// ============================================================
// Frame-wise mel-frequency cepstral coefficients with the usual
// torchaudio defaults:
//
//   STFT  → 400-point FFT, periodic Hann window, hop of 160,
//           centred frames with reflect padding
//   Mel   → 128 HTK bands over [0, sr / 2], no area normalisation
//   dB    → power to dB with an 80 dB dynamic range floor
//   DCT   → orthonormal DCT-II, first n_mfcc coefficients kept
//
// Output shape is [n_mfcc, 1 + len / 160].
//
// Reference: Davis & Mermelstein (1980)

use std::f64::consts::PI;
use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};

use crate::domain::error::DataError;
use crate::domain::features::Features;
use crate::domain::traits::Transform;

pub const N_FFT: usize = 400;
pub const HOP_LENGTH: usize = 160;
pub const N_MELS: usize = 128;
pub const DEFAULT_N_MFCC: usize = 40;

const TOP_DB: f32 = 80.0;
const AMIN: f32 = 1e-10;

pub struct Mfcc {
    sample_rate: u32,
    n_mfcc:      usize,
    window:      Vec<f32>,
    /// [N_MELS][N_FFT / 2 + 1]
    mel_filters: Vec<Vec<f32>>,
    /// [n_mfcc][N_MELS]
    dct:         Vec<Vec<f32>>,
    fft:         Arc<dyn RealToComplex<f32>>,
}

impl std::fmt::Debug for Mfcc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mfcc")
            .field("sample_rate", &self.sample_rate)
            .field("n_mfcc", &self.n_mfcc)
            .field("n_fft", &N_FFT)
            .field("hop_length", &HOP_LENGTH)
            .field("n_mels", &N_MELS)
            .finish()
    }
}

impl Mfcc {
    pub fn new(sample_rate: u32, n_mfcc: usize) -> Result<Self, DataError> {
        if sample_rate == 0 {
            return Err(mfcc_error("sample rate must be positive"));
        }
        if n_mfcc == 0 || n_mfcc > N_MELS {
            return Err(mfcc_error(&format!("n_mfcc must be in 1..={N_MELS}, got {n_mfcc}")));
        }

        let window = (0..N_FFT)
            .map(|n| (0.5 - 0.5 * (2.0 * PI * n as f64 / N_FFT as f64).cos()) as f32)
            .collect();

        let mel_filters = mel_filterbank(N_FFT / 2 + 1, 0.0, sample_rate as f64 / 2.0, N_MELS, sample_rate);
        let dct         = dct_ortho(n_mfcc, N_MELS);

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(N_FFT);

        Ok(Self { sample_rate, n_mfcc, window, mel_filters, dct, fft })
    }

    /// Mel power spectrogram in dB, laid out [N_MELS][frames]
    fn log_mel(&self, waveform: &[f32]) -> Result<(Vec<f32>, usize), DataError> {
        let padded   = center_pad(waveform, N_FFT / 2);
        let n_frames = 1 + waveform.len() / HOP_LENGTH;

        let mut input    = self.fft.make_input_vec();
        let mut spectrum = self.fft.make_output_vec();
        let mut power    = vec![0.0f32; spectrum.len()];
        let mut mel      = vec![0.0f32; N_MELS * n_frames];

        for t in 0..n_frames {
            let start = t * HOP_LENGTH;
            for (i, slot) in input.iter_mut().enumerate() {
                *slot = padded[start + i] * self.window[i];
            }

            self.fft
                .process(&mut input, &mut spectrum)
                .map_err(|e| mfcc_error(&format!("FFT failed: {e}")))?;

            for (p, c) in power.iter_mut().zip(spectrum.iter()) {
                *p = c.re * c.re + c.im * c.im;
            }

            for (m, filter) in self.mel_filters.iter().enumerate() {
                mel[m * n_frames + t] = filter.iter().zip(power.iter()).map(|(w, p)| w * p).sum();
            }
        }

        let mut max_db = f32::NEG_INFINITY;
        for v in mel.iter_mut() {
            *v = 10.0 * v.max(AMIN).log10();
            max_db = max_db.max(*v);
        }
        let floor = max_db - TOP_DB;
        for v in mel.iter_mut() {
            *v = v.max(floor);
        }

        Ok((mel, n_frames))
    }
}

impl Transform for Mfcc {
    fn name(&self) -> &'static str {
        "mfcc"
    }

    fn output_channels(&self) -> usize {
        self.n_mfcc
    }

    fn apply(&self, waveform: &[f32]) -> Result<Features, DataError> {
        if waveform.is_empty() {
            return Err(mfcc_error("cannot extract features from an empty waveform"));
        }

        let (mel, n_frames) = self.log_mel(waveform)?;

        let mut out = vec![0.0f32; self.n_mfcc * n_frames];
        for (k, basis) in self.dct.iter().enumerate() {
            let row = &mut out[k * n_frames..(k + 1) * n_frames];
            for (m, &b) in basis.iter().enumerate() {
                let band = &mel[m * n_frames..(m + 1) * n_frames];
                for (o, &v) in row.iter_mut().zip(band) {
                    *o += b * v;
                }
            }
        }

        Features::new(self.n_mfcc, n_frames, out)
    }
}

fn mfcc_error(reason: &str) -> DataError {
    DataError::Transform { transform: "mfcc".to_string(), reason: reason.to_string() }
}

/// Pad both ends by `pad` samples. Reflects (edge excluded) when the
/// signal is long enough, otherwise pads with zeros.
fn center_pad(x: &[f32], pad: usize) -> Vec<f32> {
    let n = x.len();
    let mut out = Vec::with_capacity(n + 2 * pad);
    if n > pad {
        out.extend((1..=pad).rev().map(|i| x[i]));
        out.extend_from_slice(x);
        out.extend((1..=pad).map(|i| x[n - 1 - i]));
    } else {
        out.resize(pad, 0.0);
        out.extend_from_slice(x);
        out.resize(n + 2 * pad, 0.0);
    }
    out
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular filters on an HTK mel scale, one Vec per band
fn mel_filterbank(n_freqs: usize, f_min: f64, f_max: f64, n_mels: usize, sample_rate: u32) -> Vec<Vec<f32>> {
    let nyquist = sample_rate as f64 / 2.0;
    let all_freqs: Vec<f64> = (0..n_freqs)
        .map(|i| nyquist * i as f64 / (n_freqs - 1) as f64)
        .collect();

    let m_min = hz_to_mel(f_min);
    let m_max = hz_to_mel(f_max);
    let f_pts: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(m_min + (m_max - m_min) * i as f64 / (n_mels + 1) as f64))
        .collect();

    (0..n_mels)
        .map(|m| {
            let (left, center, right) = (f_pts[m], f_pts[m + 1], f_pts[m + 2]);
            all_freqs
                .iter()
                .map(|&f| {
                    let down = (f - left) / (center - left);
                    let up   = (right - f) / (right - center);
                    down.min(up).max(0.0) as f32
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II basis, [n_mfcc][n_mels]
fn dct_ortho(n_mfcc: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let n = n_mels as f64;
    (0..n_mfcc)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_mels)
                .map(|m| (scale * (PI / n * (m as f64 + 0.5) * k as f64).cos()) as f32)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::random_audio;

    #[test]
    fn test_output_shape() {
        let mfcc = Mfcc::new(16_000, 40).unwrap();
        let f = mfcc.apply(&random_audio(16_000)).unwrap();
        assert_eq!(f.channels(), 40);
        assert_eq!(f.frames(), 101);
        assert_eq!(mfcc.output_channels(), 40);
    }

    #[test]
    fn test_finite_for_random_input() {
        let mfcc = Mfcc::new(16_000, 40).unwrap();
        let f = mfcc.apply(&random_audio(8_000)).unwrap();
        assert!(f.is_finite());
    }

    #[test]
    fn test_silence_is_flat() {
        let mfcc = Mfcc::new(16_000, 13).unwrap();
        let f = mfcc.apply(&vec![0.0; 1_600]).unwrap();
        assert!(f.is_finite());
        // Every band sits at the -100 dB floor, so only c0 is non-zero
        let c0 = -100.0 * (N_MELS as f32).sqrt();
        assert!(f.row(0).iter().all(|v| (v - c0).abs() < 1e-1));
        for k in 1..13 {
            assert!(f.row(k).iter().all(|v| v.abs() < 1e-1), "c{k} not flat");
        }
    }

    #[test]
    fn test_deterministic() {
        let mfcc = Mfcc::new(16_000, 40).unwrap();
        let wave = random_audio(4_000);
        assert_eq!(mfcc.apply(&wave).unwrap(), mfcc.apply(&wave).unwrap());
    }

    #[test]
    fn test_short_input_gives_one_frame() {
        let mfcc = Mfcc::new(16_000, 40).unwrap();
        let f = mfcc.apply(&random_audio(100)).unwrap();
        assert_eq!(f.frames(), 1);
        assert!(f.is_finite());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let mfcc = Mfcc::new(16_000, 40).unwrap();
        assert!(matches!(mfcc.apply(&[]), Err(DataError::Transform { .. })));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Mfcc::new(0, 40).is_err());
        assert!(Mfcc::new(16_000, 0).is_err());
        assert!(Mfcc::new(16_000, N_MELS + 1).is_err());
    }

    #[test]
    fn test_mel_to_hz_roundtrip() {
        for hz in [100.0, 500.0, 1000.0, 4000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reflect_padding() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(center_pad(&x, 2), vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0]);
        assert_eq!(center_pad(&x, 4), vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dct_basis_is_orthonormal() {
        let dct = dct_ortho(8, 16);
        for a in 0..8 {
            for b in 0..8 {
                let dot: f32 = dct[a].iter().zip(&dct[b]).map(|(x, y)| x * y).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-5);
            }
        }
    }
}
