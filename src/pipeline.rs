//! Runs ingestion then transformation as one straight call sequence.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::StageResult;
use crate::ingestion::DataIngestion;
use crate::observability::PipelineObserver;
use crate::transformation::{DataTransformation, TransformationArtifacts};

/// Every path produced by [`run_pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutputs {
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
    pub artifacts: TransformationArtifacts,
}

/// Ingest, split, and transform according to `config`.
///
/// Stops at the first failing stage and returns its error.
pub fn run_pipeline(
    config: &PipelineConfig,
    observer: Option<Arc<dyn PipelineObserver>>,
) -> StageResult<PipelineOutputs> {
    let mut ingestion = DataIngestion::new(config.ingestion.clone());
    let mut transformation = DataTransformation::new(config.transformation.clone());
    if let Some(obs) = observer {
        ingestion = ingestion.with_observer(Arc::clone(&obs));
        transformation = transformation.with_observer(obs);
    }

    let (train_data_path, test_data_path) = ingestion.initiate_data_ingestion()?;
    let artifacts =
        transformation.initiate_data_transformation(&train_data_path, &test_data_path)?;

    Ok(PipelineOutputs {
        train_data_path,
        test_data_path,
        artifacts,
    })
}
