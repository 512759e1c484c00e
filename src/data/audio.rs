// ============================================================
// Layer 4 — Audio Loader
// ============================================================
// Decodes WAV files into mono f32 waveforms and brings them to
// the canonical sample rate.
//
//   load()     → hound reads the RIFF/WAVE container
//                • integer PCM is scaled by 2^(bits-1) into [-1, 1)
//                • float PCM passes through unchanged
//                • multi-channel audio is averaged down to mono
//   resample() → rubato FFT resampler, skipped when the rates
//                already match
//
// Nothing is cached: each call decodes from disk again.
//
// Reference: hound crate documentation
//            rubato crate documentation (FftFixedIn)

use std::path::Path;

use hound::{SampleFormat, WavReader};
use rubato::{FftFixedIn, Resampler};

use crate::domain::error::DataError;

/// Sample rate every waveform is converted to before transforms
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Input frames per resampler call
const RESAMPLE_CHUNK: usize = 1024;

/// Decode a WAV file into a mono waveform and its native sample rate.
pub fn load(path: &Path) -> Result<(Vec<f32>, u32), DataError> {
    let file = path.display().to_string();
    let decode_err = |e: hound::Error| DataError::Decode { file: file.clone(), reason: e.to_string() };

    let reader = WavReader::open(path).map_err(decode_err)?;
    let spec   = reader.spec();

    if spec.channels == 0 {
        return Err(DataError::Decode { file, reason: "header declares zero channels".to_string() });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(decode_err)?,
        SampleFormat::Int => {
            let scale = (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(decode_err)?
        }
    };

    let waveform = downmix(interleaved, spec.channels as usize);
    tracing::debug!(
        "Decoded '{}': {} samples at {} Hz ({} channel(s))",
        file, waveform.len(), spec.sample_rate, spec.channels
    );

    Ok((waveform, spec.sample_rate))
}

/// Average interleaved frames into a single channel
fn downmix(interleaved: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved;
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample a mono waveform from `from_rate` to `to_rate`.
///
/// The output holds `ceil(len * to_rate / from_rate)` samples with
/// the resampler delay removed. Identical inputs give identical
/// outputs. `file` only labels errors.
pub fn resample(waveform: Vec<f32>, from_rate: u32, to_rate: u32, file: &str) -> Result<Vec<f32>, DataError> {
    if from_rate == to_rate || waveform.is_empty() {
        return Ok(waveform);
    }

    let resample_err = |reason: String| DataError::Resample {
        file: file.to_string(),
        from: from_rate,
        to:   to_rate,
        reason,
    };

    if from_rate == 0 || to_rate == 0 {
        return Err(resample_err("sample rate must be positive".to_string()));
    }

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        RESAMPLE_CHUNK,
        2,
        1,
    )
    .map_err(|e| resample_err(e.to_string()))?;

    let expected = (waveform.len() as u64 * u64::from(to_rate)).div_ceil(u64::from(from_rate)) as usize;
    let delay    = resampler.output_delay();

    let mut out    = Vec::with_capacity(expected + delay);
    let mut block  = vec![Vec::with_capacity(RESAMPLE_CHUNK)];
    let mut cursor = 0usize;

    // Feed the signal chunk by chunk, then zeros, until the delayed
    // tail of the signal has come out of the resampler.
    while out.len() < expected + delay {
        let need = resampler.input_frames_next();
        let end  = (cursor + need).min(waveform.len());

        block[0].clear();
        block[0].extend_from_slice(&waveform[cursor..end]);
        block[0].resize(need, 0.0);
        cursor = end;

        let produced = resampler
            .process(&block, None)
            .map_err(|e| resample_err(e.to_string()))?;
        out.extend_from_slice(&produced[0]);
    }

    out.drain(..delay);
    out.truncate(expected);
    Ok(out)
}
