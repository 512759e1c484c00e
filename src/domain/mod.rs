// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits describing what the
// pipeline works with: emotions, labelled files, feature
// matrices, metric keys and the error taxonomy.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Everything here is immutable after construction, so it is
// safe to share between dataloader worker threads.
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// The seven EMO-DB emotion classes and the code → index table
pub mod emotion;

// A WAV file paired with its parsed class index
pub mod labeled_file;

// Channel × time feature matrices produced by transforms
pub mod features;

// Keys of the metrics reported by the training and validation steps
pub mod metric;

// Error taxonomy shared by the catalog, loader and assembler
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
