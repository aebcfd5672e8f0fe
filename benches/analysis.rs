//! Analyzer benchmarks
//!
//! Grouping and rendering cost over stores of increasing size.
//!
//! Run with: cargo bench --bench analysis

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use topk_sweep::analysis::AnalysisReport;
use topk_sweep::experiment::ExperimentRecord;
use topk_sweep::sweep::SweepPlan;

const SIZES: [usize; 3] = [50, 1_000, 20_000];

fn synthetic_records(n: usize) -> Vec<ExperimentRecord> {
    let pairs = SweepPlan::default_grid().combinations();
    let story = vec!["word"; 112].join(" ");
    (0..n)
        .map(|i| {
            let params = pairs[i % pairs.len()];
            #[allow(clippy::cast_precision_loss)]
            let time = 5.0 + (i % 7) as f64 * 0.1;
            ExperimentRecord::new("llama3.2", "bench", params, time, story.clone())
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for size in SIZES {
        let records = synthetic_records(size);
        group.bench_with_input(BenchmarkId::new("from_records", size), &records, |b, data| {
            b.iter(|| AnalysisReport::from_records(black_box(data)));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let report = AnalysisReport::from_records(&synthetic_records(1_000));
    c.bench_function("render_text", |b| b.iter(|| black_box(&report).render_text()));
}

criterion_group!(benches, bench_aggregate, bench_render);
criterion_main!(benches);
