//! Interner benchmarks.
//!
//! Run with: `cargo bench --bench interner_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use weave_util::interner::{DefaultInterner, Interner};

fn bench_intern(c: &mut Criterion) {
    let mut group = c.benchmark_group("intern");
    group.throughput(Throughput::Elements(1));

    group.bench_function("intern_new_string", |b| {
        let interner = DefaultInterner::new();
        let mut counter = 0u64;
        b.iter(|| {
            counter += 1;
            let name = format!("new_string_{counter}");
            black_box(interner.intern(name.as_bytes()))
        })
    });

    group.bench_function("intern_existing_string", |b| {
        let interner = DefaultInterner::new();
        let _ = interner.intern(b"existing_string");
        b.iter(|| black_box(interner.intern(b"existing_string")))
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(1));

    let interner = DefaultInterner::new();
    let sym = interner.intern(b"hello_world");

    group.bench_function("resolve", |b| b.iter(|| black_box(interner.resolve(sym))));

    group.finish();
}

fn bench_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("varying_sizes");

    for &size in &[1usize, 10, 100, 1000, 10000] {
        let bytes = vec![b'a'; size];
        group.bench_with_input(BenchmarkId::new("intern", size), &bytes, |b, bytes| {
            let interner = DefaultInterner::new();
            b.iter(|| black_box(interner.intern(bytes)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_intern, bench_resolve, bench_varying_sizes);
criterion_main!(benches);
