//! Ingestion: reading the source dataset and producing train/test splits.
//!
//! Most callers should use [`DataIngestion`], which:
//!
//! - reads the source CSV into an in-memory [`crate::types::DataSet`] (every column as text)
//! - writes an unmodified "raw" copy
//! - shuffles rows with a fixed seed and writes the train/test partitions
//!
//! The building blocks are also available under:
//! - [`csv`]
//! - [`split`]

pub mod csv;
pub mod split;
pub mod stage;

pub use split::{TrainTestSplit, train_test_split};
pub use stage::DataIngestion;
