//! Holds the dataset for the lifetime of an interactive session.
//!
//! The dataset is loaded at most once; every query afterwards borrows it.

use crate::error::LoadError;
use crate::loader::{load_raw_rows, RawLoad};
use crate::normalize::{normalize, Dataset, NormalizeReport};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub malformed_rows: usize,
    pub report: NormalizeReport,
}

#[derive(Debug)]
pub struct Session {
    data_path: PathBuf,
    dataset: OnceCell<Dataset>,
}

impl Session {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            dataset: OnceCell::new(),
        }
    }

    /// A session whose dataset is already built.
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            data_path: PathBuf::new(),
            dataset: OnceCell::with_value(dataset),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Load and normalize the source file. Returns `None` when the dataset
    /// was already loaded, in which case nothing is read.
    pub fn load(&self) -> Result<Option<LoadSummary>, LoadError> {
        if self.dataset.get().is_some() {
            return Ok(None);
        }
        let RawLoad {
            rows,
            malformed_rows,
        } = load_raw_rows(&self.data_path)?;
        let (dataset, report) = normalize(rows);
        if self.dataset.set(dataset).is_err() {
            return Ok(None);
        }
        Ok(Some(LoadSummary {
            malformed_rows,
            report,
        }))
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.get()
    }
}
