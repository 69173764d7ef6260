//! Stage configuration.
//!
//! Each stage takes its paths and policies from an explicit config struct, decided once at
//! construction. [`Default`] reproduces the conventional layout (`data/source_data.csv` in,
//! everything else under `artifacts/`); [`DataIngestionConfig::in_dir`] and
//! [`DataTransformationConfig::in_dir`] point the same file names at another directory, which
//! is what tests use.
//!
//! ```no_run
//! use ml_prep_pipeline::config::PipelineConfig;
//!
//! # fn main() -> Result<(), ml_prep_pipeline::PipelineError> {
//! // Missing keys fall back to their defaults.
//! let cfg = PipelineConfig::from_json_path("pipeline.json")?;
//! println!("train split goes to {}", cfg.ingestion.train_data_path.display());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Default directory for every produced file.
pub const ARTIFACTS_DIR: &str = "artifacts";
/// Default location of the source dataset.
pub const SOURCE_DATA_PATH: &str = "data/source_data.csv";
/// Default seed of the train/test shuffle.
pub const DEFAULT_SEED: u64 = 42;
/// Default fraction of rows assigned to the test split.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Paths and split policy for [`crate::ingestion::DataIngestion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataIngestionConfig {
    /// Dataset to ingest.
    pub source_path: PathBuf,
    /// Unmodified copy of the source.
    pub raw_data_path: PathBuf,
    /// Training split output.
    pub train_data_path: PathBuf,
    /// Test split output.
    pub test_data_path: PathBuf,
    /// Fraction of rows in the test split, within `[0, 1]`.
    pub test_ratio: f64,
    /// Shuffle seed.
    pub seed: u64,
}

impl DataIngestionConfig {
    /// Read `source_path` and write `raw.csv`, `train.csv`, `test.csv` into `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, source_path: impl Into<PathBuf>) -> Self {
        let dir = dir.as_ref();
        Self {
            source_path: source_path.into(),
            raw_data_path: dir.join("raw.csv"),
            train_data_path: dir.join("train.csv"),
            test_data_path: dir.join("test.csv"),
            ..Self::default()
        }
    }

    /// Reject values the stage cannot run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if !(0.0..=1.0).contains(&self.test_ratio) {
            return Err(PipelineError::InvalidConfig {
                message: format!("test_ratio must be within [0, 1], got {}", self.test_ratio),
            });
        }
        Ok(())
    }
}

impl Default for DataIngestionConfig {
    fn default() -> Self {
        let dir = Path::new(ARTIFACTS_DIR);
        Self {
            source_path: PathBuf::from(SOURCE_DATA_PATH),
            raw_data_path: dir.join("raw.csv"),
            train_data_path: dir.join("train.csv"),
            test_data_path: dir.join("test.csv"),
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
        }
    }
}

/// Paths and column roles for [`crate::transformation::DataTransformation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTransformationConfig {
    /// Fitted transformer artifact (bincode).
    pub preprocessor_path: PathBuf,
    /// Transformed training matrix.
    pub transformed_train_path: PathBuf,
    /// Transformed test matrix.
    pub transformed_test_path: PathBuf,
    /// Column appended, untransformed, as the last output column.
    pub target_column: String,
    /// Columns imputed with the median and standardized.
    pub numeric_columns: Vec<String>,
    /// Columns imputed with the most frequent value and one-hot encoded.
    pub categorical_columns: Vec<String>,
}

impl DataTransformationConfig {
    /// Write `preprocessor.bin`, `transformed_train.csv`, `transformed_test.csv` into `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            preprocessor_path: dir.join("preprocessor.bin"),
            transformed_train_path: dir.join("transformed_train.csv"),
            transformed_test_path: dir.join("transformed_test.csv"),
            ..Self::default()
        }
    }

    /// Reject values the stage cannot run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.numeric_columns.is_empty() && self.categorical_columns.is_empty() {
            return Err(PipelineError::InvalidConfig {
                message: "no feature columns configured".to_string(),
            });
        }
        let mut seen: Vec<&str> = Vec::new();
        for col in self
            .numeric_columns
            .iter()
            .chain(self.categorical_columns.iter())
            .chain(std::iter::once(&self.target_column))
        {
            if seen.contains(&col.as_str()) {
                return Err(PipelineError::InvalidConfig {
                    message: format!("column '{col}' is assigned more than one role"),
                });
            }
            seen.push(col);
        }
        Ok(())
    }
}

impl Default for DataTransformationConfig {
    fn default() -> Self {
        let dir = Path::new(ARTIFACTS_DIR);
        Self {
            preprocessor_path: dir.join("preprocessor.bin"),
            transformed_train_path: dir.join("transformed_train.csv"),
            transformed_test_path: dir.join("transformed_test.csv"),
            target_column: "math score".to_string(),
            numeric_columns: vec!["reading score".to_string(), "writing score".to_string()],
            categorical_columns: vec![
                "gender".to_string(),
                "race/ethnicity".to_string(),
                "parental level of education".to_string(),
                "lunch".to_string(),
                "test preparation course".to_string(),
            ],
        }
    }
}

/// Configuration of a full [`crate::pipeline::run_pipeline`] run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ingestion: DataIngestionConfig,
    pub transformation: DataTransformationConfig,
}

impl PipelineConfig {
    /// Load a config from a JSON file. Missing keys take their default values.
    pub fn from_json_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a config from JSON text. Missing keys take their default values.
    pub fn from_json_str(text: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DataIngestionConfig, DataTransformationConfig, PipelineConfig};

    #[test]
    fn defaults_use_artifacts_layout() {
        let ing = DataIngestionConfig::default();
        assert_eq!(ing.source_path, PathBuf::from("data/source_data.csv"));
        assert_eq!(ing.raw_data_path, PathBuf::from("artifacts").join("raw.csv"));
        assert_eq!(ing.seed, 42);
        assert_eq!(ing.test_ratio, 0.2);

        let tr = DataTransformationConfig::default();
        assert_eq!(tr.preprocessor_path, PathBuf::from("artifacts").join("preprocessor.bin"));
        assert_eq!(tr.target_column, "math score");
        assert_eq!(tr.numeric_columns.len(), 2);
        assert_eq!(tr.categorical_columns.len(), 5);
    }

    #[test]
    fn in_dir_keeps_columns_and_moves_paths() {
        let tr = DataTransformationConfig::in_dir("/tmp/x");
        assert_eq!(tr.transformed_test_path, PathBuf::from("/tmp/x/transformed_test.csv"));
        assert_eq!(tr.target_column, "math score");
    }

    #[test]
    fn json_config_fills_missing_keys_with_defaults() {
        let cfg = PipelineConfig::from_json_str(
            r#"{"ingestion": {"seed": 7, "source_path": "in.csv"},
                "transformation": {"target_column": "y"}}"#,
        )
        .unwrap();

        assert_eq!(cfg.ingestion.seed, 7);
        assert_eq!(cfg.ingestion.source_path, PathBuf::from("in.csv"));
        assert_eq!(cfg.ingestion.test_ratio, 0.2);
        assert_eq!(cfg.transformation.target_column, "y");
        assert_eq!(cfg.transformation.numeric_columns.len(), 2);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let ing = DataIngestionConfig {
            test_ratio: -0.1,
            ..Default::default()
        };
        assert!(ing.validate().is_err());

        let tr = DataTransformationConfig {
            categorical_columns: vec!["math score".to_string()],
            ..Default::default()
        };
        let msg = tr.validate().unwrap_err().to_string();
        assert!(msg.contains("more than one role"));

        let empty = DataTransformationConfig {
            numeric_columns: vec![],
            categorical_columns: vec![],
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }
}
