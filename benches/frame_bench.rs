use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rusty_pandas::io::parse_csv;
use rusty_pandas::scan::prefix_sum;
use rusty_pandas::{Axis, DataFrame};

fn synthetic_csv(rows: usize, cols: usize) -> String {
    let header: Vec<String> = (0..cols).map(|c| format!("c{}", c)).collect();
    let mut text = header.join(",");
    text.push('\n');
    for r in 0..rows {
        let line: Vec<String> = (0..cols)
            .map(|c| (((r * 31 + c * 17) % 2001) as f64 / 10.0 - 100.0).to_string())
            .collect();
        text.push_str(&line.join(","));
        text.push('\n');
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = synthetic_csv(20_000, 16);
    c.bench_function("parse_csv 20k x 16", |b| {
        b.iter(|| {
            let df = parse_csv(black_box(&text), "bench").expect("synthetic csv parses");
            black_box(df)
        })
    });
}

fn bench_reductions(c: &mut Criterion) {
    let df: DataFrame = parse_csv(&synthetic_csv(20_000, 16), "bench").expect("synthetic csv parses");
    c.bench_function("sum columns", |b| b.iter(|| black_box(df.sum(Axis::Columns))));
    c.bench_function("sum rows", |b| b.iter(|| black_box(df.sum(Axis::Rows))));
    c.bench_function("max columns", |b| b.iter(|| black_box(df.max(Axis::Columns))));
    c.bench_function("max rows", |b| b.iter(|| black_box(df.max(Axis::Rows))));
}

fn bench_scan(c: &mut Criterion) {
    let xs: Vec<f64> = (0..1_000_000).map(|i| (i % 7) as f64).collect();
    c.bench_function("prefix_sum 1M", |b| b.iter(|| black_box(prefix_sum(black_box(&xs)))));
}

criterion_group!(benches, bench_parse, bench_reductions, bench_scan);
criterion_main!(benches);
