//! Error types shared by both pipeline stages.
//!
//! Low-level failures are collected in [`PipelineError`]. At the boundary of each stage entry
//! operation they are wrapped into a [`StageError`], which records the stage and the source
//! location where the failure left the stage.

use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// Convenience result type for operations below the stage boundary.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Convenience result type returned by stage entry operations.
pub type StageResult<T> = Result<T, StageError>;

/// Error type returned by reading, splitting, fitting, transforming, and persisting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON configuration error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transformer artifact could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// The input does not conform to the expected columns.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A configuration value is out of range.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    /// A transformer was asked to fit on zero rows.
    #[error("cannot fit on empty data: {message}")]
    EmptyData { message: String },

    /// The target column has no value in some row.
    #[error("missing target value '{column}' at row {row}")]
    MissingTarget { column: String, row: usize },

    /// A fitted transformer received rows with the wrong number of columns.
    #[error("feature mismatch: expected {expected} columns, got {got}")]
    FeatureMismatch { expected: usize, got: usize },
}

/// Pipeline stage that produced a [`StageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingestion,
    Transformation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingestion => f.write_str("ingestion"),
            Stage::Transformation => f.write_str("transformation"),
        }
    }
}

/// The single reportable error kind of the pipeline.
///
/// Carries the originating failure, the `file:line` where it crossed the stage boundary, and a
/// composed human-readable message (its `Display`).
#[derive(Debug, Error)]
#[error(
    "[{stage}] error occurred in [{}] line number [{}] error message [{source}]",
    .location.file(),
    .location.line()
)]
pub struct StageError {
    /// Stage whose entry operation failed.
    pub stage: Stage,
    /// Where the failure was wrapped.
    pub location: &'static Location<'static>,
    /// Originating failure.
    #[source]
    pub source: PipelineError,
}

impl StageError {
    /// Wrap `source`, recording the caller's location.
    #[track_caller]
    pub fn new(stage: Stage, source: impl Into<PipelineError>) -> Self {
        Self {
            stage,
            location: Location::caller(),
            source: source.into(),
        }
    }
}

/// Wrap any convertible error into a [`StageError`] at the call site.
pub trait StageResultExt<T> {
    /// Convert the error (if any) into a [`StageError`] tagged with `stage`.
    fn in_stage(self, stage: Stage) -> StageResult<T>;
}

impl<T, E> StageResultExt<T> for Result<T, E>
where
    E: Into<PipelineError>,
{
    #[track_caller]
    fn in_stage(self, stage: Stage) -> StageResult<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(StageError::new(stage, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PipelineError, Stage, StageError, StageResultExt};

    #[test]
    fn in_stage_records_call_site() {
        let res: Result<(), PipelineError> = Err(PipelineError::InvalidConfig {
            message: "bad".to_string(),
        });
        let line = line!() + 1;
        let err = res.in_stage(Stage::Ingestion).unwrap_err();

        assert_eq!(err.stage, Stage::Ingestion);
        assert_eq!(err.location.line(), line);
        assert!(err.location.file().ends_with("error.rs"));
    }

    #[test]
    fn stage_error_message_composes_location_and_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err = StageError::new(Stage::Transformation, io);
        let msg = err.to_string();

        assert!(msg.starts_with("[transformation] error occurred in ["));
        assert!(msg.contains("line number ["));
        assert!(msg.contains("error message [io error: nope]"));
    }

    #[test]
    fn stage_error_exposes_source_chain() {
        use std::error::Error as _;

        let err = StageError::new(
            Stage::Ingestion,
            PipelineError::EmptyData {
                message: "x".to_string(),
            },
        );
        let src = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert_eq!(src, "cannot fit on empty data: x");
    }
}
