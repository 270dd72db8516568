//! Criterion benchmarks for `mt-math`.
//!
//! Focus on the kernels that dominate scenario runs: exact updates and
//! convolutions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mt_math::{concat, ratio, Pmf, PmfError};

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for size in [2_usize, 16, 128] {
        let prior: Pmf<usize> = {
            let mut pmf = Pmf::uniform(0..size);
            pmf.normalize().expect("normalize");
            pmf
        };
        group.bench_with_input(BenchmarkId::new("exact", size), &prior, |b, prior| {
            b.iter(|| {
                let mut pmf = prior.clone();
                let total = pmf
                    .update_by(|&i| Ok::<_, PmfError>(ratio(i as i64 + 1, size as i64 + 1)))
                    .expect("update");
                black_box(total);
            });
        });
    }

    group.finish();
}

fn bench_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");

    let status = Pmf::from_items([("sick", ratio(1, 4)), ("notsick", ratio(3, 4))]).expect("pmf");
    group.bench_function("concat_pair", |b| {
        b.iter(|| black_box(status.combine(&status, concat)));
    });

    let die: Pmf<u32> = {
        let mut pmf = Pmf::uniform(1..=20);
        pmf.normalize().expect("normalize");
        pmf
    };
    group.bench_function("sum_d20", |b| {
        b.iter(|| black_box(die.add(&die)));
    });

    group.finish();
}

criterion_group!(benches, bench_update, bench_combine);
criterion_main!(benches);
