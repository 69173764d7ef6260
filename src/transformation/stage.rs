//! The transformation stage: train/test splits in, model-ready matrices plus the fitted
//! preprocessor out.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DataTransformationConfig;
use crate::error::{PipelineError, PipelineResult, Stage, StageResult, StageResultExt};
use crate::ingestion::csv::{read_csv_from_path, write_matrix_to_path};
use crate::observability::{PipelineObserver, Reporter, StageContext, StageStats};
use crate::preprocessing::Preprocessor;
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Paths written by [`DataTransformation::initiate_data_transformation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationArtifacts {
    /// Transformed training matrix (CSV, target last).
    pub transformed_train_path: PathBuf,
    /// Transformed test matrix (CSV, target last).
    pub transformed_test_path: PathBuf,
    /// Fitted preprocessor (bincode).
    pub preprocessor_path: PathBuf,
}

/// Fits the preprocessor on the training split and applies it to both splits.
#[derive(Clone)]
pub struct DataTransformation {
    config: DataTransformationConfig,
    reporter: Reporter,
}

impl fmt::Debug for DataTransformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTransformation")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DataTransformation {
    /// Create the stage from its configuration.
    pub fn new(config: DataTransformationConfig) -> Self {
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
    pub fn config(&self) -> &DataTransformationConfig {
        &self.config
    }

    /// The unfitted preprocessing definition built from the configured column roles.
    pub fn get_data_transformer(&self) -> Preprocessor {
        Preprocessor::new(
            self.config.numeric_columns.clone(),
            self.config.categorical_columns.clone(),
        )
    }

    /// Run the stage on the given split files.
    ///
    /// The preprocessor is fitted on `train_path` only, then applied unchanged to both splits.
    /// Any failure is wrapped into a [`crate::StageError`], reported to the observer, and
    /// returned.
    pub fn initiate_data_transformation(
        &self,
        train_path: impl AsRef<Path>,
        test_path: impl AsRef<Path>,
    ) -> StageResult<TransformationArtifacts> {
        let train_path = train_path.as_ref();
        let test_path = test_path.as_ref();
        let ctx = StageContext::new(
            Stage::Transformation,
            vec![train_path.to_path_buf(), test_path.to_path_buf()],
        );
        self.reporter.started(&ctx);

        match self.run(&ctx, train_path, test_path) {
            Ok(stats) => {
                self.reporter.finished(&ctx, stats);
                Ok(TransformationArtifacts {
                    transformed_train_path: self.config.transformed_train_path.clone(),
                    transformed_test_path: self.config.transformed_test_path.clone(),
                    preprocessor_path: self.config.preprocessor_path.clone(),
                })
            }
            Err(e) => {
                self.reporter.failed(&ctx, &e);
                Err(e)
            }
        }
    }

    fn run(
        &self,
        ctx: &StageContext,
        train_path: &Path,
        test_path: &Path,
    ) -> StageResult<StageStats> {
        let cfg = &self.config;
        cfg.validate().in_stage(Stage::Transformation)?;

        let schema = self.split_schema();
        let train_df = read_csv_from_path(train_path, &schema).in_stage(Stage::Transformation)?;
        let test_df = read_csv_from_path(test_path, &schema).in_stage(Stage::Transformation)?;
        self.reporter.progress(
            ctx,
            &format!(
                "read train and test data: {} + {} rows",
                train_df.row_count(),
                test_df.row_count()
            ),
        );

        let train_target =
            target_values(&train_df, &cfg.target_column).in_stage(Stage::Transformation)?;
        let test_target =
            target_values(&test_df, &cfg.target_column).in_stage(Stage::Transformation)?;

        let preprocessor = self.get_data_transformer();
        let (fitted, train_features) =
            preprocessor.fit_transform(&train_df).in_stage(Stage::Transformation)?;
        let test_features = fitted.transform(&test_df).in_stage(Stage::Transformation)?;
        self.reporter.progress(
            ctx,
            &format!(
                "preprocessor fitted on train split: {} output features",
                fitted.n_features_out()
            ),
        );

        let train_arr = append_target(train_features, &train_target);
        let test_arr = append_target(test_features, &test_target);
        let width = fitted.n_features_out() + 1;

        write_matrix_to_path(&cfg.transformed_train_path, width, &train_arr)
            .in_stage(Stage::Transformation)?;
        write_matrix_to_path(&cfg.transformed_test_path, width, &test_arr)
            .in_stage(Stage::Transformation)?;
        fitted.save(&cfg.preprocessor_path).in_stage(Stage::Transformation)?;
        self.reporter.progress(
            ctx,
            &format!("preprocessor saved to {}", cfg.preprocessor_path.display()),
        );

        Ok(StageStats {
            train_rows: train_arr.len(),
            test_rows: test_arr.len(),
            columns: width,
        })
    }

    /// Columns read from each split: numeric features, categorical features, then the target.
    fn split_schema(&self) -> Schema {
        let cfg = &self.config;
        let mut fields = Vec::new();
        fields.extend(
            cfg.numeric_columns
                .iter()
                .map(|c| Field::new(c.as_str(), DataType::Float64)),
        );
        fields.extend(
            cfg.categorical_columns
                .iter()
                .map(|c| Field::new(c.as_str(), DataType::Utf8)),
        );
        fields.push(Field::new(cfg.target_column.as_str(), DataType::Float64));
        Schema::new(fields)
    }
}

/// Target column as numbers. A missing target is an error.
fn target_values(data: &DataSet, column: &str) -> PipelineResult<Vec<f64>> {
    let values = data.column(column).ok_or_else(|| PipelineError::SchemaMismatch {
        message: format!("missing target column '{column}'"),
    })?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Value::Float64(x) if x.is_nan() => Err(PipelineError::MissingTarget {
                column: column.to_string(),
                row,
            }),
            other => other.as_f64().ok_or_else(|| PipelineError::MissingTarget {
                column: column.to_string(),
                row,
            }),
        })
        .collect()
}

fn append_target(mut features: Vec<Vec<f64>>, target: &[f64]) -> Vec<Vec<f64>> {
    for (row, &y) in features.iter_mut().zip(target) {
        row.push(y);
    }
    features
}

#[cfg(test)]
mod tests {
    use super::{append_target, target_values};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn target_values_rejects_missing() {
        let schema = Schema::new(vec![Field::new("math score", DataType::Float64)]);
        let ds = DataSet::new(
            schema,
            vec![vec![Value::Float64(70.0)], vec![Value::Null]],
        );
        let err = target_values(&ds, "math score").unwrap_err();
        assert_eq!(err.to_string(), "missing target value 'math score' at row 1");
    }

    #[test]
    fn append_target_puts_target_last() {
        let out = append_target(vec![vec![1.0, 2.0], vec![3.0, 4.0]], &[9.0, 8.0]);
        assert_eq!(out, vec![vec![1.0, 2.0, 9.0], vec![3.0, 4.0, 8.0]]);
    }
}
