//! The ingestion stage: source CSV in, raw copy plus train/test splits out.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DataIngestionConfig;
use crate::error::{Stage, StageResult, StageResultExt};
use crate::observability::{PipelineObserver, Reporter, StageContext, StageStats};

use super::csv::{read_csv_as_text, write_csv_to_path};
use super::split::train_test_split;

/// Reads the source dataset, persists a raw copy, and writes a seeded train/test split.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use ml_prep_pipeline::config::DataIngestionConfig;
/// use ml_prep_pipeline::ingestion::DataIngestion;
/// use ml_prep_pipeline::observability::TracingObserver;
///
/// # fn main() -> Result<(), ml_prep_pipeline::StageError> {
/// let ingestion = DataIngestion::new(DataIngestionConfig::in_dir("out", "students.csv"))
///     .with_observer(Arc::new(TracingObserver));
/// let (train, test) = ingestion.initiate_data_ingestion()?;
/// println!("train={} test={}", train.display(), test.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DataIngestion {
    config: DataIngestionConfig,
    reporter: Reporter,
}

impl fmt::Debug for DataIngestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataIngestion")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DataIngestion {
    /// Create the stage from its configuration.
    pub fn new(config: DataIngestionConfig) -> Self {
        Self {
            config,
            reporter: Reporter::default(),
        }
    }

    /// Attach an observer for logging.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.reporter = Reporter::new(Some(observer));
        self
    }

    /// Stage configuration.
    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    /// Run the stage and return `(train_path, test_path)`.
    ///
    /// Any failure is wrapped into a [`crate::StageError`], reported to the observer, and
    /// returned. Files written before the failure are left in place.
    pub fn initiate_data_ingestion(&self) -> StageResult<(PathBuf, PathBuf)> {
        let ctx = StageContext::new(Stage::Ingestion, vec![self.config.source_path.clone()]);
        self.reporter.started(&ctx);

        match self.run(&ctx) {
            Ok(stats) => {
                self.reporter.finished(&ctx, stats);
                Ok((
                    self.config.train_data_path.clone(),
                    self.config.test_data_path.clone(),
                ))
            }
            Err(e) => {
                self.reporter.failed(&ctx, &e);
                Err(e)
            }
        }
    }

    fn run(&self, ctx: &StageContext) -> StageResult<StageStats> {
        let cfg = &self.config;
        cfg.validate().in_stage(Stage::Ingestion)?;

        let df = read_csv_as_text(&cfg.source_path).in_stage(Stage::Ingestion)?;
        self.reporter.progress(
            ctx,
            &format!("read the dataset: {} rows, {} columns", df.row_count(), df.column_count()),
        );

        write_csv_to_path(&cfg.raw_data_path, &df).in_stage(Stage::Ingestion)?;
        self.reporter.progress(
            ctx,
            &format!("raw copy written to {}", cfg.raw_data_path.display()),
        );

        let (train, test) =
            train_test_split(&df, cfg.test_ratio, cfg.seed).in_stage(Stage::Ingestion)?;
        write_csv_to_path(&cfg.train_data_path, &train).in_stage(Stage::Ingestion)?;
        write_csv_to_path(&cfg.test_data_path, &test).in_stage(Stage::Ingestion)?;
        self.reporter.progress(
            ctx,
            &format!(
                "train-test split completed (seed={}, test_ratio={})",
                cfg.seed, cfg.test_ratio
            ),
        );

        Ok(StageStats {
            train_rows: train.row_count(),
            test_rows: test.row_count(),
            columns: df.column_count(),
        })
    }
}
