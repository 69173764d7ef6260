//! `ml-prep-pipeline` is a small, linear data preparation pipeline for tabular machine-learning
//! datasets.
//!
//! Two stages, composed by passing file paths:
//!
//! - **Ingestion** ([`ingestion::DataIngestion`]): reads the source CSV, writes a raw copy, and
//!   writes an 80/20 train/test split shuffled with a fixed seed.
//! - **Transformation** ([`transformation::DataTransformation`]): fits a preprocessor on the
//!   training split (median imputation + standard scaling for numeric columns, most-frequent
//!   imputation + one-hot encoding for categorical columns), applies it to both splits, appends
//!   the target column, and persists the matrices plus the fitted preprocessor.
//!
//! The fitted preprocessor only ever observes the training split. The test split goes through
//! `transform` alone.
//!
//! ## Running both stages
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ml_prep_pipeline::config::{DataIngestionConfig, DataTransformationConfig, PipelineConfig};
//! use ml_prep_pipeline::observability::TracingObserver;
//! use ml_prep_pipeline::pipeline::run_pipeline;
//!
//! # fn main() -> Result<(), ml_prep_pipeline::StageError> {
//! let config = PipelineConfig {
//!     ingestion: DataIngestionConfig::in_dir("out", "students.csv"),
//!     transformation: DataTransformationConfig::in_dir("out"),
//! };
//! let outputs = run_pipeline(&config, Some(Arc::new(TracingObserver)))?;
//! println!("model-ready train matrix: {}", outputs.artifacts.transformed_train_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Reusing the fitted preprocessor
//!
//! ```no_run
//! use ml_prep_pipeline::ingestion::csv::read_csv_as_text;
//! use ml_prep_pipeline::preprocessing::FittedPreprocessor;
//!
//! # fn main() -> Result<(), ml_prep_pipeline::PipelineError> {
//! let fitted = FittedPreprocessor::load("artifacts/preprocessor.bin")?;
//! let new_rows = read_csv_as_text("new_students.csv")?;
//! let features = fitted.transform(&new_rows)?;
//! println!("{} rows x {} features", features.len(), fitted.n_features_out());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV I/O, seeded splitting, the ingestion stage
//! - [`preprocessing`]: imputers, scaler, one-hot encoder, and the column transformer
//! - [`transformation`]: the transformation stage
//! - [`pipeline`]: both stages in sequence
//! - [`config`]: stage configuration
//! - [`observability`]: logging observers
//! - [`types`]: in-memory dataset types
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod pipeline;
pub mod preprocessing;
pub mod transformation;
pub mod types;

pub use error::{PipelineError, PipelineResult, Stage, StageError, StageResult};
