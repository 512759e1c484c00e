// ============================================================
// Layer 5 — Macro Accuracy
// ============================================================
// Per-class recall averaged uniformly over classes, so a class
// with few utterances counts as much as a frequent one.
//
//   recall_c = correct predictions of c / targets equal to c
//
// A class that appears neither in the targets nor in the
// predictions is left out of the average. A class that is only
// predicted (never a target) scores 0.

use burn::prelude::*;

pub fn macro_accuracy(preds: &[i64], targets: &[i64], n_classes: usize) -> f64 {
    let mut support   = vec![0usize; n_classes];
    let mut predicted = vec![0usize; n_classes];
    let mut correct   = vec![0usize; n_classes];

    let in_range = |c: i64| (c >= 0 && (c as usize) < n_classes).then_some(c as usize);

    for (&p, &t) in preds.iter().zip(targets) {
        if let Some(t) = in_range(t) {
            support[t] += 1;
            if p == t as i64 {
                correct[t] += 1;
            }
        }
        if let Some(p) = in_range(p) {
            predicted[p] += 1;
        }
    }

    let scores: Vec<f64> = (0..n_classes)
        .filter(|&c| support[c] > 0 || predicted[c] > 0)
        .map(|c| if support[c] == 0 { 0.0 } else { correct[c] as f64 / support[c] as f64 })
        .collect();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Macro accuracy of arg-max predictions for a batch of logits
pub fn batch_macro_accuracy<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>, n_classes: usize) -> f64 {
    // argmax(1) returns shape [batch, 1] — flatten to [batch]
    let preds: Vec<i64>   = logits.argmax(1).flatten::<1>(0, 1).into_data().iter::<i64>().collect();
    let targets: Vec<i64> = targets.into_data().iter::<i64>().collect();
    macro_accuracy(&preds, &targets, n_classes)
}
