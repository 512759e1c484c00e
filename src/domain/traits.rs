// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Capability interfaces that keep the layers decoupled:
//
//   Transform  → turns a mono waveform into a feature matrix.
//                Implemented by Identity ("raw") and Mfcc ("mfcc").
//   MetricSink → receives scalar metrics keyed by MetricKey.
//                Implemented by the epoch accumulator in infra,
//                and by plain maps in tests.
//
// Transforms are shared by every dataloader worker, hence the
// Send + Sync bound; they hold no mutable state after new().
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::collections::BTreeMap;

use crate::domain::error::DataError;
use crate::domain::features::Features;
use crate::domain::metric::MetricKey;

// ─── Transform ────────────────────────────────────────────────────────────────
pub trait Transform: Send + Sync + std::fmt::Debug {
    /// Registry name, e.g. "raw" or "mfcc"
    fn name(&self) -> &'static str;

    /// Number of rows every output of `apply` has
    fn output_channels(&self) -> usize;

    /// Turn a waveform (already at the target sample rate) into
    /// a [output_channels, frames] matrix. Finite input must give
    /// finite output.
    fn apply(&self, waveform: &[f32]) -> Result<Features, DataError>;
}

// ─── MetricSink ───────────────────────────────────────────────────────────────
pub trait MetricSink {
    fn log(&mut self, key: MetricKey, value: f64);
}

/// A plain map keeps the most recent value per key.
impl MetricSink for BTreeMap<MetricKey, f64> {
    fn log(&mut self, key: MetricKey, value: f64) {
        self.insert(key, value);
    }
}
