// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   — trains the classifier on EMO-DB recordings
//   2. `predict` — loads a checkpoint and classifies one file
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};
use std::path::Path;

#[derive(Parser, Debug)]
#[command(
    name = "emodb-ser",
    version = "0.1.0",
    about = "Train a 1-D CNN speech emotion classifier on EMO-DB, then classify recordings."
)]
pub struct Cli {
    /// The subcommand to run (train or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => Self::run_train(args),
            Commands::Predict(args) => Self::run_predict(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on recordings in: {}", args.data_dir);

        let checkpoint_dir = args.checkpoint_dir.clone();
        TrainUseCase::new(args.into()).execute()?;

        println!("Training complete. Checkpoints saved to '{checkpoint_dir}'.");
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case   = PredictUseCase::new(&args.checkpoint_dir)?;
        let prediction = use_case.classify(Path::new(&args.file))?;

        println!(
            "\nEmotion: {} ({:.1}%)",
            prediction.emotion,
            prediction.confidence * 100.0
        );
        for (emotion, p) in &prediction.probabilities {
            println!("  {:<10} {:>6.2}%", emotion.name(), p * 100.0);
        }
        Ok(())
    }
}
