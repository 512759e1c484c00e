// ============================================================
// Layer 4 — Feature Transforms and Registry
// ============================================================
// Maps a transform name to a ready-to-use Transform:
//
//   "raw"  → Identity  (the waveform as a [1, T] matrix)
//   "mfcc" → Mfcc      ([n_mfcc, frames] cepstral features)
//
// The process-wide registry lives in a OnceLock. It is installed
// once at startup with the run's sample rate and coefficient
// count, then only read. Every dataloader worker shares the same
// Arc'd transforms.
//
// Reference: std::sync::OnceLock
//            Rust Book §17 (Trait Objects)

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::data::audio::TARGET_SAMPLE_RATE;
use crate::data::mfcc::{Mfcc, DEFAULT_N_MFCC};
use crate::domain::error::DataError;
use crate::domain::features::Features;
use crate::domain::traits::Transform;

/// Passthrough transform
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn output_channels(&self) -> usize {
        1
    }

    fn apply(&self, waveform: &[f32]) -> Result<Features, DataError> {
        Ok(Features::mono(waveform.to_vec()))
    }
}

static REGISTRY: OnceLock<TransformRegistry> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct TransformRegistry {
    sample_rate: u32,
    n_mfcc:      usize,
    entries:     BTreeMap<&'static str, Arc<dyn Transform>>,
}

impl TransformRegistry {
    /// Build a registry whose MFCC expects `sample_rate` input
    pub fn new(sample_rate: u32, n_mfcc: usize) -> Result<Self, DataError> {
        let mut entries: BTreeMap<&'static str, Arc<dyn Transform>> = BTreeMap::new();
        let raw: Arc<dyn Transform>  = Arc::new(Identity);
        let mfcc: Arc<dyn Transform> = Arc::new(Mfcc::new(sample_rate, n_mfcc)?);
        entries.insert(raw.name(), raw);
        entries.insert(mfcc.name(), mfcc);
        Ok(Self { sample_rate, n_mfcc, entries })
    }

    /// Install the process-wide registry. Only the first call builds
    /// anything; later calls get the registry that is already there.
    pub fn install(sample_rate: u32, n_mfcc: usize) -> Result<&'static Self, DataError> {
        if let Some(existing) = REGISTRY.get() {
            if existing.sample_rate != sample_rate || existing.n_mfcc != n_mfcc {
                tracing::warn!(
                    "Transform registry already installed ({} Hz, {} MFCCs); ignoring ({} Hz, {} MFCCs)",
                    existing.sample_rate, existing.n_mfcc, sample_rate, n_mfcc
                );
            }
            return Ok(existing);
        }
        let registry = Self::new(sample_rate, n_mfcc)?;
        Ok(REGISTRY.get_or_init(|| registry))
    }

    /// The process-wide registry, installed with defaults if needed
    pub fn global() -> Result<&'static Self, DataError> {
        match REGISTRY.get() {
            Some(registry) => Ok(registry),
            None => Self::install(TARGET_SAMPLE_RATE, DEFAULT_N_MFCC),
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Transform>, DataError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::UnknownTransform {
                name:      name.to_string(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_a_noop() {
        let wave = vec![0.0f32; 16_000];
        let f = Identity.apply(&wave).unwrap();
        assert_eq!(f.channels(), 1);
        assert_eq!(f.frames(), 16_000);
        assert_eq!(f.values(), wave.as_slice());

        let wave = vec![0.25, -1.0, 3.5];
        assert_eq!(Identity.apply(&wave).unwrap().values(), wave.as_slice());
    }

    #[test]
    fn test_registry_lookup() {
        let registry = TransformRegistry::new(16_000, 40).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["mfcc", "raw"]);
        assert_eq!(registry.get("raw").unwrap().output_channels(), 1);
        assert_eq!(registry.get("mfcc").unwrap().output_channels(), 40);
    }

    #[test]
    fn test_unknown_transform() {
        let registry = TransformRegistry::new(16_000, 40).unwrap();
        let err = registry.get("spectrogram").unwrap_err();
        assert!(matches!(err, DataError::UnknownTransform { .. }));
        assert!(err.to_string().contains("mfcc, raw"));
    }

    #[test]
    fn test_global_is_shared() {
        let a = TransformRegistry::global().unwrap();
        let b = TransformRegistry::global().unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(a.get("raw").is_ok());
    }
}
