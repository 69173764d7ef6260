//! Numeric branch: median imputation followed by standard scaling.
//!
//! For a training column `x` with missing cells replaced by the median `m`:
//!
//! ```text
//! z = (x - u) / s
//! ```
//!
//! where `u` is the mean and `s` the population standard deviation of the imputed training
//! column. A constant column gets `s = 1`.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Standard deviations below this are treated as zero.
const MIN_SCALE: f64 = 1e-10;

/// Median of `values`, or `None` when empty. Even lengths average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Learned parameters of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedNumericColumn {
    /// Source column name.
    pub column: String,
    /// Fill value for missing cells.
    pub median: f64,
    /// Mean of the imputed training column.
    pub mean: f64,
    /// Divisor applied after centering.
    pub scale: f64,
}

impl FittedNumericColumn {
    /// Learn median, mean, and scale from a training column. `None` marks a missing cell.
    pub fn fit(column: &str, values: &[Option<f64>]) -> PipelineResult<Self> {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let median = median(&present).ok_or_else(|| PipelineError::EmptyData {
            message: format!("numeric column '{column}' has no non-missing values"),
        })?;

        let imputed: Vec<f64> = values.iter().map(|v| v.unwrap_or(median)).collect();
        let n = imputed.len() as f64;
        let mean = imputed.iter().sum::<f64>() / n;
        let var = imputed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        let scale = if std < MIN_SCALE { 1.0 } else { std };

        Ok(Self {
            column: column.to_string(),
            median,
            mean,
            scale,
        })
    }

    /// Impute then scale a single cell.
    pub fn transform_value(&self, value: Option<f64>) -> f64 {
        (value.unwrap_or(self.median) - self.mean) / self.scale
    }
}
