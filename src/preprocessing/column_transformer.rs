//! Column transformer: routes named columns through the numeric and categorical branches and
//! concatenates the results.
//!
//! Output layout, left to right:
//!
//! - one standardized column per numeric column, in configured order
//! - one one-hot block per categorical column, in configured order, each block ordered by the
//!   sorted training vocabulary
//!
//! Columns of the input that are in neither list are dropped.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::ingestion::csv::ensure_parent_dir;
use crate::types::{DataSet, Value, is_missing_token};

use super::categorical::FittedCategoricalColumn;
use super::numeric::FittedNumericColumn;

/// Unfitted preprocessing definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessor {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
}

impl Preprocessor {
    /// Define a preprocessor over the given numeric and categorical columns.
    pub fn new(numeric_columns: Vec<String>, categorical_columns: Vec<String>) -> Self {
        Self {
            numeric_columns,
            categorical_columns,
        }
    }

    /// Columns routed through the numeric branch.
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    /// Columns routed through the categorical branch.
    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    /// Learn every branch's parameters from `data`.
    ///
    /// Only `data` is observed; pass the training split here and nothing else.
    pub fn fit(&self, data: &DataSet) -> PipelineResult<FittedPreprocessor> {
        if data.row_count() == 0 {
            return Err(PipelineError::EmptyData {
                message: "cannot fit preprocessor on zero rows".to_string(),
            });
        }

        let mut numeric = Vec::with_capacity(self.numeric_columns.len());
        for name in &self.numeric_columns {
            let values = numeric_column(data, name)?;
            numeric.push(FittedNumericColumn::fit(name, &values)?);
        }

        let mut categorical = Vec::with_capacity(self.categorical_columns.len());
        for name in &self.categorical_columns {
            let owned = categorical_column(data, name)?;
            let values: Vec<Option<&str>> = owned.iter().map(|v| v.as_deref()).collect();
            categorical.push(FittedCategoricalColumn::fit(name, &values)?);
        }

        Ok(FittedPreprocessor {
            numeric,
            categorical,
        })
    }

    /// Fit on `data` and transform it with the result.
    pub fn fit_transform(
        &self,
        data: &DataSet,
    ) -> PipelineResult<(FittedPreprocessor, Vec<Vec<f64>>)> {
        let fitted = self.fit(data)?;
        let out = fitted.transform(data)?;
        Ok((fitted, out))
    }
}

/// Fitted preprocessor ready for inference. Never mutated after fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    numeric: Vec<FittedNumericColumn>,
    categorical: Vec<FittedCategoricalColumn>,
}

impl FittedPreprocessor {
    /// Parameters learned for each numeric column.
    pub fn numeric(&self) -> &[FittedNumericColumn] {
        &self.numeric
    }

    /// Parameters learned for each categorical column.
    pub fn categorical(&self) -> &[FittedCategoricalColumn] {
        &self.categorical
    }

    /// Number of output columns.
    pub fn n_features_out(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.width()).sum::<usize>()
    }

    /// Name of every output column: numeric column names, then `<column>_<category>`.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|c| c.column.clone()).collect();
        for col in &self.categorical {
            names.extend(col.categories.iter().map(|cat| format!("{}_{cat}", col.column)));
        }
        names
    }

    /// Apply the learned parameters to `data`, one output row per input row.
    ///
    /// Missing cells are imputed with the fitted values; unseen categories encode as zeros.
    pub fn transform(&self, data: &DataSet) -> PipelineResult<Vec<Vec<f64>>> {
        let numeric_cols = self
            .numeric
            .iter()
            .map(|c| numeric_column(data, &c.column))
            .collect::<PipelineResult<Vec<_>>>()?;
        let categorical_cols = self
            .categorical
            .iter()
            .map(|c| categorical_column(data, &c.column))
            .collect::<PipelineResult<Vec<_>>>()?;

        let width = self.n_features_out();
        let mut out = Vec::with_capacity(data.row_count());
        for row in 0..data.row_count() {
            let mut features = Vec::with_capacity(width);
            for (fitted, values) in self.numeric.iter().zip(&numeric_cols) {
                features.push(fitted.transform_value(values[row]));
            }
            for (fitted, values) in self.categorical.iter().zip(&categorical_cols) {
                fitted.encode_into(values[row].as_deref(), &mut features);
            }
            out.push(features);
        }
        Ok(out)
    }

    /// Persist as a bincode blob. Parent directories are created if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> PipelineResult<()> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a blob written by [`FittedPreprocessor::save`].
    pub fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

fn column_index(data: &DataSet, name: &str) -> PipelineResult<usize> {
    data.schema
        .index_of(name)
        .ok_or_else(|| PipelineError::SchemaMismatch {
            message: format!(
                "missing required column '{name}'. columns={:?}",
                data.schema.field_names().collect::<Vec<_>>()
            ),
        })
}

/// Numeric view of a column. Null, NaN, and missing-value tokens are missing; other text must
/// parse.
fn numeric_column(data: &DataSet, name: &str) -> PipelineResult<Vec<Option<f64>>> {
    let idx = column_index(data, name)?;
    data.rows
        .iter()
        .enumerate()
        .map(|(row, values)| match &values[idx] {
            Value::Null => Ok(None),
            Value::Utf8(s) if is_missing_token(s) => Ok(None),
            Value::Utf8(s) => s
                .trim()
                .parse::<f64>()
                .map(|v| Some(v).filter(|v| !v.is_nan()))
                .map_err(|e| PipelineError::ParseError {
                    row,
                    column: name.to_string(),
                    raw: s.clone(),
                    message: e.to_string(),
                }),
            other => Ok(other.as_f64().filter(|v| !v.is_nan())),
        })
        .collect()
}

/// Text view of a column. Null, NaN, and missing-value tokens are missing; numbers use their CSV
/// rendering.
fn categorical_column(data: &DataSet, name: &str) -> PipelineResult<Vec<Option<String>>> {
    let idx = column_index(data, name)?;
    Ok(data
        .rows
        .iter()
        .map(|values| match &values[idx] {
            Value::Null => None,
            Value::Float64(v) if v.is_nan() => None,
            Value::Utf8(s) if is_missing_token(s) => None,
            other => Some(other.to_field_string()),
        })
        .collect())
}
