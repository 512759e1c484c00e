// Test-only helpers that synthesise small EMO-DB style corpora.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use rand::Rng;

/// Write mono 32-bit float PCM
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = WavSpec {
        channels:        1,
        sample_rate,
        bits_per_sample: 32,
        sample_format:   SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// Write interleaved 16-bit integer PCM
pub fn write_wav_i16(path: &Path, samples: &[i16], channels: u16, sample_rate: u32) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format:   SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

/// Uniform noise in [-1, 1)
pub fn random_audio(len: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// One second of 16 kHz noise per name
pub fn make_corpus(dir: &Path, names: &[&str]) {
    for name in names {
        write_wav(&dir.join(name), &random_audio(16_000), 16_000);
    }
}
