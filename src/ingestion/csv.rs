//! CSV reading and writing.

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, DataType, Schema, Value, is_missing_token};

/// Read a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ). Extra columns are dropped.
/// - Each value is parsed according to the schema field type.
pub fn read_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> PipelineResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr, schema)
}

/// Read a CSV file keeping every cell verbatim as text, in header order.
///
/// No schema is enforced and no cell is interpreted, so writing the result back with
/// [`write_csv_to_path`] reproduces the file. Columns are taken by position, so repeated header
/// names keep their own data. Missing-value detection happens when a column is consumed (see
/// [`crate::types::is_missing_token`]).
pub fn read_csv_as_text(path: impl AsRef<Path>) -> PipelineResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let schema = Schema::utf8(rdr.headers()?.iter());

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|cell| Value::Utf8(cell.to_owned())).collect());
    }

    Ok(DataSet::new(schema, rows))
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> PipelineResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(PipelineError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Write a dataset as CSV: header row of field names, then one record per row, no index column.
///
/// Parent directories are created if needed.
pub fn write_csv_to_path(path: impl AsRef<Path>, dataset: &DataSet) -> PipelineResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(Value::to_field_string))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a numeric matrix as CSV with a positional header (`0,1,...,width-1`).
///
/// The header is written even when `rows` is empty. Every row must be exactly `width` wide.
pub fn write_matrix_to_path(
    path: impl AsRef<Path>,
    width: usize,
    rows: &[Vec<f64>],
) -> PipelineResult<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record((0..width).map(|i| i.to_string()))?;
    for row in rows {
        if row.len() != width {
            return Err(PipelineError::FeatureMismatch {
                expected: width,
                got: row.len(),
            });
        }
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Create the parent directory of `path`, if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> PipelineResult<Value> {
    if is_missing_token(raw) {
        return Ok(Value::Null);
    }
    let trimmed = raw.trim();

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        DataType::Int64 => trimmed.parse::<i64>().map(Value::Int64).map_err(|e| {
            PipelineError::ParseError {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }
        }),
        DataType::Float64 => match trimmed.parse::<f64>() {
            Ok(v) if v.is_nan() => Ok(Value::Null),
            Ok(v) => Ok(Value::Float64(v)),
            Err(e) => Err(PipelineError::ParseError {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }),
        },
    }
}
