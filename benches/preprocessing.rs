use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ml_prep_pipeline::ingestion::train_test_split;
use ml_prep_pipeline::preprocessing::Preprocessor;
use ml_prep_pipeline::types::{DataSet, DataType, Field, Schema, Value};

const GROUPS: [&str; 5] = ["group A", "group B", "group C", "group D", "group E"];

fn synthetic(n: usize) -> DataSet {
    let schema = Schema::new(vec![
        Field::new("reading score", DataType::Float64),
        Field::new("writing score", DataType::Float64),
        Field::new("race/ethnicity", DataType::Utf8),
        Field::new("lunch", DataType::Utf8),
    ]);
    let rows = (0..n)
        .map(|i| {
            let reading = if i % 17 == 0 {
                Value::Null
            } else {
                Value::Float64((i * 7 % 100) as f64)
            };
            vec![
                reading,
                Value::Float64((i * 13 % 100) as f64),
                Value::Utf8(GROUPS[i % GROUPS.len()].to_string()),
                Value::Utf8(if i % 3 == 0 { "free/reduced" } else { "standard" }.to_string()),
            ]
        })
        .collect();
    DataSet::new(schema, rows)
}

fn preprocessor() -> Preprocessor {
    Preprocessor::new(
        vec!["reading score".to_string(), "writing score".to_string()],
        vec!["race/ethnicity".to_string(), "lunch".to_string()],
    )
}

fn bench_fit(c: &mut Criterion) {
    for size in [1_000, 10_000, 100_000].iter() {
        let data = synthetic(*size);
        c.bench_with_input(BenchmarkId::new("fit", size), &data, |b, data| {
            let pre = preprocessor();
            b.iter(|| black_box(pre.fit(black_box(data)).unwrap()));
        });
    }
}

fn bench_transform(c: &mut Criterion) {
    for size in [1_000, 10_000, 100_000].iter() {
        let data = synthetic(*size);
        let fitted = preprocessor().fit(&data).unwrap();
        c.bench_with_input(BenchmarkId::new("transform", size), &data, |b, data| {
            b.iter(|| black_box(fitted.transform(black_box(data)).unwrap()));
        });
    }
}

fn bench_split(c: &mut Criterion) {
    for size in [1_000, 100_000].iter() {
        let data = synthetic(*size);
        c.bench_with_input(BenchmarkId::new("train_test_split", size), &data, |b, data| {
            b.iter(|| black_box(train_test_split(black_box(data), 0.2, 42).unwrap()));
        });
    }
}

criterion_group!(benches, bench_fit, bench_transform, bench_split);
criterion_main!(benches);
