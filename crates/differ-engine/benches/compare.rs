//! Benchmark: full comparison of two generated source files.
//!
//! Measures opcode computation plus draining the event stream at several
//! file sizes, with and without replace refinement.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use differ_engine::{CompareOptions, DetailMode, DiffSession};

// ── Helpers ──

/// Generate a source-like file with `n` lines. Every `edit_every`-th line is
/// altered so both versions share most of their content.
fn generate_lines(n: usize, edit_every: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let edited = edit_every > 0 && i % edit_every == 0;
            match i % 4 {
                0 => format!("fn item_{}() {{\n", i),
                1 if edited => format!("    let value = {} * 3;\n", i),
                1 => format!("    let value = {} * 2;\n", i),
                2 => "    value\n".to_string(),
                _ => "}\n".to_string(),
            }
        })
        .collect()
}

fn run_compare(a: &[String], b: &[String], options: CompareOptions) -> usize {
    let mut session = DiffSession::new();
    session.set_sequences(a.to_vec(), b.to_vec());
    session.compare(options).filter(Result::is_ok).count()
}

// ── Benchmarks ──

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    for &n in &[100, 1000, 5000] {
        let a = generate_lines(n, 0);
        let b = generate_lines(n, 7);

        group.bench_with_input(BenchmarkId::new("line_pairs", n), &n, |bench, _| {
            bench.iter(|| black_box(run_compare(&a, &b, CompareOptions::default())));
        });

        let plain = CompareOptions::default().with_detail_mode(DetailMode::None);
        group.bench_with_input(BenchmarkId::new("no_detail", n), &n, |bench, _| {
            bench.iter(|| black_box(run_compare(&a, &b, plain)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compare);
criterion_main!(benches);
