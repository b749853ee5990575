//! Benchmarks for crate name validation and semver ordering.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pkgmirror_cargo::{CrateVersionedPackage, parse_dependency, parse_package_name};
use pkgmirror_core::{VersionedPackage, sort_newest_first};
use std::hint::black_box;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_package_name", |b| {
        b.iter(|| parse_package_name(black_box("tracing-subscriber")));
    });
    c.bench_function("parse_dependency", |b| {
        b.iter(|| parse_dependency(black_box("openssl-src@300.1.3+3.1.2")));
    });
}

fn bench_sort_versions(c: &mut Criterion) {
    let mut group = c.benchmark_group("crates_sort_newest_first");

    for size in [10usize, 100, 1000] {
        let versions: Vec<String> = (0..size)
            .map(|i| {
                if i % 5 == 0 {
                    format!("{}.{}.{}-rc.{}", i % 3, i % 17, i, i % 2)
                } else {
                    format!("{}.{}.{}", i % 3, i % 17, i)
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &versions, |b, versions| {
            b.iter_batched(
                || {
                    versions
                        .iter()
                        .filter_map(|v| CrateVersionedPackage::new("pkg", v).ok())
                        .map(|v| Box::new(v) as Box<dyn VersionedPackage>)
                        .collect::<Vec<_>>()
                },
                |mut packages| {
                    sort_newest_first(&mut packages);
                    packages
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_sort_versions);
criterion_main!(benches);
