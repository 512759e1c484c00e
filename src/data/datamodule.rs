// ============================================================
// Layer 4 — Data Module
// ============================================================
// Ties the catalog, loader and batcher together:
//
//   setup()            → scan + sort + split + parse labels
//   collate()          → pad_collate on the requested device
//   train_dataloader() → shuffled (seeded) Burn DataLoader
//   val_dataloader()   → ordered Burn DataLoader
//
// Burn's DataLoader spreads batch assembly over `worker_count`
// threads. Workers share only the read-only file lists and the
// Arc'd transform; every batch they build is owned by whoever
// pulls it from the iterator.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use std::path::PathBuf;
use std::sync::Arc;

use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};

use crate::data::batcher::{pad_collate, BatchResult, PadBatcher};
use crate::data::catalog;
use crate::data::dataset::{EmoDbDataset, EmoSample};
use crate::domain::error::DataError;
use crate::domain::traits::Transform;

pub type BatchLoader<B> = Arc<dyn DataLoader<BatchResult<B>>>;

// ─── DataModule ───────────────────────────────────────────────────────────────
/// Anything that can prepare train / validation splits and hand
/// out batch iterators for them.
pub trait DataModule {
    /// Build the train and test datasets. Must run before the loaders.
    fn setup(&mut self) -> Result<(), DataError>;

    fn collate<B: Backend>(&self, samples: Vec<EmoSample>, device: &B::Device) -> BatchResult<B>;

    fn train_dataloader<B: Backend>(&self, device: &B::Device) -> Result<BatchLoader<B>, DataError>;

    fn val_dataloader<B: Backend>(&self, device: &B::Device) -> Result<BatchLoader<B>, DataError>;
}

/// Settings the data module needs from the training config
#[derive(Debug, Clone)]
pub struct DataModuleConfig {
    pub data_dir:     PathBuf,
    pub batch_size:   usize,
    pub split_ratio:  f64,
    pub sample_rate:  u32,
    pub worker_count: usize,
    pub seed:         u64,
}

pub struct EmoDataModule {
    config:    DataModuleConfig,
    transform: Arc<dyn Transform>,
    train_ds:  Option<EmoDbDataset>,
    test_ds:   Option<EmoDbDataset>,
}

impl EmoDataModule {
    pub fn new(config: DataModuleConfig, transform: Arc<dyn Transform>) -> Self {
        Self { config, transform, train_ds: None, test_ds: None }
    }

    pub fn train_dataset(&self) -> Option<&EmoDbDataset> {
        self.train_ds.as_ref()
    }

    pub fn test_dataset(&self) -> Option<&EmoDbDataset> {
        self.test_ds.as_ref()
    }

    fn build_loader<B: Backend>(
        &self,
        dataset: Option<&EmoDbDataset>,
        shuffle: bool,
        device:  &B::Device,
    ) -> Result<BatchLoader<B>, DataError> {
        let dataset = dataset.ok_or(DataError::NotSetUp)?.clone();

        let mut builder = DataLoaderBuilder::new(PadBatcher::<B>::new(device.clone()))
            .batch_size(self.config.batch_size);
        if shuffle {
            builder = builder.shuffle(self.config.seed);
        }
        // Zero workers: batches are assembled on the iterating thread
        if self.config.worker_count > 0 {
            builder = builder.num_workers(self.config.worker_count);
        }

        Ok(builder.build(dataset))
    }
}

impl DataModule for EmoDataModule {
    fn setup(&mut self) -> Result<(), DataError> {
        let dir = &self.config.data_dir;

        let all_files = catalog::scan(dir)?;
        let (train_names, test_names) = catalog::split(all_files, self.config.split_ratio);

        let train_files = catalog::label_files(dir, &train_names)?;
        let test_files  = catalog::label_files(dir, &test_names)?;

        tracing::info!(
            "Data module ready: {} train / {} test files from '{}' (transform '{}')",
            train_files.len(),
            test_files.len(),
            dir.display(),
            self.transform.name(),
        );

        self.train_ds = Some(EmoDbDataset::new(train_files, self.transform.clone(), self.config.sample_rate));
        self.test_ds  = Some(EmoDbDataset::new(test_files, self.transform.clone(), self.config.sample_rate));
        Ok(())
    }

    fn collate<B: Backend>(&self, samples: Vec<EmoSample>, device: &B::Device) -> BatchResult<B> {
        pad_collate(samples, device)
    }

    fn train_dataloader<B: Backend>(&self, device: &B::Device) -> Result<BatchLoader<B>, DataError> {
        self.build_loader(self.train_ds.as_ref(), true, device)
    }

    fn val_dataloader<B: Backend>(&self, device: &B::Device) -> Result<BatchLoader<B>, DataError> {
        self.build_loader(self.test_ds.as_ref(), false, device)
    }
}
