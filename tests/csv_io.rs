use ml_prep_pipeline::ingestion::csv::{
    read_csv_as_text, read_csv_from_path, read_csv_from_reader, write_csv_to_path,
    write_matrix_to_path,
};
use ml_prep_pipeline::types::{DataSet, DataType, Field, Schema, Value};

fn scores_schema() -> Schema {
    Schema::new(vec![
        Field::new("gender", DataType::Utf8),
        Field::new("reading score", DataType::Float64),
        Field::new("math score", DataType::Int64),
    ])
}

#[test]
fn read_csv_from_path_happy_path() {
    let ds = read_csv_from_path("tests/fixtures/students.csv", &scores_schema()).unwrap();

    assert_eq!(ds.row_count(), 20);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Utf8("female".to_string()),
            Value::Float64(72.0),
            Value::Int64(72),
        ]
    );
}

#[test]
fn read_csv_allows_reordered_columns_and_drops_extras() {
    let input = "math score,extra,reading score,gender\n70,x,81.5,male\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = read_csv_from_reader(&mut rdr, &scores_schema()).unwrap();
    assert_eq!(ds.column_count(), 3);
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Utf8("male".to_string()),
            Value::Float64(81.5),
            Value::Int64(70),
        ]
    );
}

#[test]
fn read_csv_errors_on_missing_required_column() {
    let input = "gender,reading score\nmale,80\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let err = read_csv_from_reader(&mut rdr, &scores_schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'math score'"));
}

#[test]
fn read_csv_errors_on_type_parse() {
    let input = "gender,reading score,math score\nmale,eighty,70\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let err = read_csv_from_reader(&mut rdr, &scores_schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value at row 2"));
    assert!(msg.contains("column 'reading score'"));
}

#[test]
fn empty_cells_become_null() {
    let input = "gender,reading score,math score\n,,70\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = read_csv_from_reader(&mut rdr, &scores_schema()).unwrap();
    assert_eq!(ds.rows[0], vec![Value::Null, Value::Null, Value::Int64(70)]);
}

#[test]
fn na_tokens_become_null_in_typed_columns() {
    let input = "gender,reading score,math score\nNA,NaN,NA\nN/A,nan,70\nnull, NA ,71\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let ds = read_csv_from_reader(&mut rdr, &scores_schema()).unwrap();
    assert_eq!(ds.rows[0], vec![Value::Null, Value::Null, Value::Null]);
    assert_eq!(ds.rows[1], vec![Value::Null, Value::Null, Value::Int64(70)]);
    assert_eq!(ds.rows[2], vec![Value::Null, Value::Null, Value::Int64(71)]);
}

#[test]
fn read_as_text_keeps_cells_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("na.csv");
    std::fs::write(&path, "a,b\nNA,\n x ,1\n").unwrap();

    let ds = read_csv_as_text(&path).unwrap();
    assert_eq!(
        ds.rows,
        vec![
            vec![Value::Utf8("NA".to_string()), Value::Utf8(String::new())],
            vec![Value::Utf8(" x ".to_string()), Value::Utf8("1".to_string())],
        ]
    );
}

#[test]
fn read_as_text_keeps_repeated_header_columns_apart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    let out = dir.path().join("dup_copy.csv");
    std::fs::write(&path, "score,score,name\n1,2,x\n3,4,y\n").unwrap();

    let ds = read_csv_as_text(&path).unwrap();
    assert_eq!(ds.rows[0][1], Value::Utf8("2".to_string()));
    assert_eq!(ds.rows[1][1], Value::Utf8("4".to_string()));

    write_csv_to_path(&out, &ds).unwrap();
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "score,score,name\n1,2,x\n3,4,y\n"
    );
}

#[test]
fn read_as_text_keeps_every_column_in_header_order() {
    let ds = read_csv_as_text("tests/fixtures/students.csv").unwrap();

    assert_eq!(ds.row_count(), 20);
    assert_eq!(
        ds.schema.field_names().collect::<Vec<_>>(),
        vec![
            "gender",
            "race/ethnicity",
            "parental level of education",
            "lunch",
            "test preparation course",
            "math score",
            "reading score",
            "writing score",
        ]
    );
    assert!(ds.schema.fields.iter().all(|f| f.data_type == DataType::Utf8));
    assert_eq!(ds.rows[0][2], Value::Utf8("bachelor's degree".to_string()));
}

#[test]
fn text_dataset_writes_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("copy").join("raw.csv");

    let ds = read_csv_as_text("tests/fixtures/students.csv").unwrap();
    write_csv_to_path(&out, &ds).unwrap();

    let original = std::fs::read_to_string("tests/fixtures/students.csv").unwrap();
    let copy = std::fs::read_to_string(&out).unwrap();
    assert_eq!(copy, original);
}

#[test]
fn write_csv_renders_null_as_empty_cell() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nulls.csv");
    let ds = DataSet::new(
        Schema::utf8(["a", "b"]),
        vec![vec![Value::Null, Value::Utf8("x".to_string())]],
    );

    write_csv_to_path(&out, &ds).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "a,b\n,x\n");
}

#[test]
fn write_matrix_uses_positional_header() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("m.csv");

    write_matrix_to_path(&out, 3, &[vec![1.5, -2.0, 0.0], vec![0.25, 1.0, 3.0]]).unwrap();
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "0,1,2\n1.5,-2,0\n0.25,1,3\n"
    );
}

#[test]
fn write_matrix_writes_header_for_empty_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.csv");

    write_matrix_to_path(&out, 3, &[]).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "0,1,2\n");
}

#[test]
fn write_matrix_rejects_ragged_rows() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_matrix_to_path(dir.path().join("m.csv"), 2, &[vec![1.0, 2.0], vec![1.0]])
        .unwrap_err();
    assert!(err.to_string().contains("feature mismatch"));
}
