//! Categorical branch: most-frequent imputation followed by one-hot encoding.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Most frequent value, or `None` when empty. Ties go to the lexicographically smallest value.
pub fn most_frequent<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    // BTreeMap iterates in ascending key order; keep the first maximum seen.
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, c)) if c >= count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

/// Learned parameters of one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedCategoricalColumn {
    /// Source column name.
    pub column: String,
    /// Fill value for missing cells.
    pub most_frequent: String,
    /// Sorted training vocabulary; one output column per entry.
    pub categories: Vec<String>,
}

impl FittedCategoricalColumn {
    /// Learn the fill value and vocabulary from a training column. `None` marks a missing cell.
    pub fn fit(column: &str, values: &[Option<&str>]) -> PipelineResult<Self> {
        let fill = most_frequent(values.iter().flatten().copied())
            .ok_or_else(|| PipelineError::EmptyData {
                message: format!("categorical column '{column}' has no non-missing values"),
            })?
            .to_string();

        let categories: BTreeSet<&str> = values.iter().map(|v| v.unwrap_or(&fill)).collect();

        Ok(Self {
            column: column.to_string(),
            most_frequent: fill.clone(),
            categories: categories.into_iter().map(str::to_string).collect(),
        })
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Append the one-hot block for `value` to `out`.
    ///
    /// Categories not seen during fit produce an all-zero block.
    pub fn encode_into(&self, value: Option<&str>, out: &mut Vec<f64>) {
        let value = value.unwrap_or(&self.most_frequent);
        let hit = self
            .categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok();
        out.extend((0..self.categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
    }
}
