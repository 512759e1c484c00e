// ============================================================
// Layer 3 — Metric Keys
// ============================================================
// The four scalar metrics the classifier reports each step.
// The string form is what appears in logs and the CSV header.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKey {
    TrainLoss,
    TrainAcc,
    ValLoss,
    ValAcc,
}

impl MetricKey {
    pub const ALL: [MetricKey; 4] = [
        MetricKey::TrainLoss,
        MetricKey::TrainAcc,
        MetricKey::ValLoss,
        MetricKey::ValAcc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::TrainLoss => "train_loss",
            MetricKey::TrainAcc  => "train_acc",
            MetricKey::ValLoss   => "val_loss",
            MetricKey::ValAcc    => "val_acc",
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
