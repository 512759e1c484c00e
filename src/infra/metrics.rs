// ============================================================
// Layer 6 — Metrics
// ============================================================
// Two pieces:
//
//   EpochAccumulator → the MetricSink the training loop hands to
//                      training_step / validation_step. Keeps a
//                      running mean per MetricKey.
//
//   MetricsLogger    → appends one CSV row per epoch:
//
//     epoch,train_loss,train_acc,val_loss,val_acc
//     1,1.912345,0.183000,1.884100,0.201000
//     2,1.801200,0.254000,1.790300,0.263000
//
// An epoch without batches for a split (e.g. split_ratio = 1.0
// leaves no validation files) records NaN for that split.
//
// Output file: checkpoints/metrics.csv
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::domain::metric::MetricKey;
use crate::domain::traits::MetricSink;

// ─── EpochAccumulator ─────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct EpochAccumulator {
    /// key → (sum, count)
    totals: BTreeMap<MetricKey, (f64, usize)>,
}

impl EpochAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean of everything logged under `key`, None if nothing was
    pub fn mean(&self, key: MetricKey) -> Option<f64> {
        self.totals
            .get(&key)
            .filter(|(_, n)| *n > 0)
            .map(|(sum, n)| sum / *n as f64)
    }

    pub fn count(&self, key: MetricKey) -> usize {
        self.totals.get(&key).map(|(_, n)| *n).unwrap_or(0)
    }
}

impl MetricSink for EpochAccumulator {
    fn log(&mut self, key: MetricKey, value: f64) {
        let entry = self.totals.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
}

// ─── EpochMetrics ─────────────────────────────────────────────────────────────
/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub train_acc:  f64,
    pub val_loss:   f64,
    pub val_acc:    f64,
}

impl EpochMetrics {
    pub fn from_accumulator(epoch: usize, acc: &EpochAccumulator) -> Self {
        let get = |key| acc.mean(key).unwrap_or(f64::NAN);
        Self {
            epoch,
            train_loss: get(MetricKey::TrainLoss),
            train_acc:  get(MetricKey::TrainAcc),
            val_loss:   get(MetricKey::ValLoss),
            val_acc:    get(MetricKey::ValAcc),
        }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────
/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        // Header only for a new file so reruns append below earlier epochs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            let header: Vec<&str> = MetricKey::ALL.iter().map(|k| k.as_str()).collect();
            writeln!(f, "epoch,{}", header.join(","))?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch,
            m.train_loss,
            m.train_acc,
            m.val_loss,
            m.val_acc,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
