// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from a directory of .wav files
// all the way to padded tensor batches.
//
// The pipeline flows in this order:
//
//   EMO-DB directory
//       │
//       ▼
//   catalog           → lists + sorts .wav files, splits them,
//       │               parses the emotion code from each name
//       ▼
//   audio             → decodes WAV, resamples to 16 kHz
//       │
//       ▼
//   transform / mfcc  → raw waveform or MFCC feature matrix
//       │
//       ▼
//   EmoDbDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   PadBatcher        → pads to the batch's longest sample, stacks
//       │
//       ▼
//   EmoDataModule     → builds the train / validation DataLoaders
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Scans, labels and splits the corpus files
pub mod catalog;

/// Decodes and resamples WAV audio
pub mod audio;

/// MFCC feature extraction
pub mod mfcc;

/// Transform registry ("raw", "mfcc")
pub mod transform;

/// Implements Burn's Dataset trait for EMO-DB utterances
pub mod dataset;

/// Implements Burn's Batcher trait with per-batch zero padding
pub mod batcher;

/// Setup plus train / validation DataLoaders
pub mod datamodule;

#[cfg(test)]
pub(crate) mod fixtures;
