//! Benchmarks for pkgmirror-core: path sanitization, tag validation,
//! version ordering and tarball extraction.
//!
//! Performance targets:
//! - Sanitizing one archive entry: < 1μs
//! - Sorting 1000 versions: < 1ms
//! - Extracting a 100-file tarball: < 10ms

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flate2::Compression;
use flate2::write::GzEncoder;
use pkgmirror_core::{
    Package, VersionedPackage, extract_tar_gz, is_valid_tag_name, sanitize_archive_path,
    sort_newest_first,
};
use std::any::Any;
use std::cmp::Ordering;
use std::hint::black_box;
use std::path::Path;

#[derive(Debug)]
struct DottedVersion {
    package: Package,
    version: String,
    key: Vec<u64>,
}

impl DottedVersion {
    fn boxed(version: String) -> Box<dyn VersionedPackage> {
        let key = version.split('.').filter_map(|p| p.parse().ok()).collect();
        Box::new(Self {
            package: Package::new("bench", "pkg"),
            version,
            key,
        })
    }
}

impl VersionedPackage for DottedVersion {
    fn package(&self) -> &Package {
        &self.package
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn versioned_package_syntax(&self) -> String {
        format!("pkg@{}", self.version)
    }

    fn compare(&self, other: &dyn VersionedPackage) -> Ordering {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => self.key.cmp(&other.key),
            None => self.version.as_str().cmp(other.version()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Archive entry validation runs once per file of every downloaded package.
fn bench_sanitize(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize_archive_path");
    let dest = Path::new("/tmp/pkgmirror-bench");

    let entries = [
        ("simple", "index.js"),
        ("nested", "src/components/widgets/button/index.tsx"),
        ("traversal", "../../etc/passwd"),
        ("git_dir", "vendor/.git/hooks/pre-commit"),
        ("normalized", "lib/../src/./main.rs"),
    ];

    for (name, entry) in entries {
        group.bench_with_input(BenchmarkId::from_parameter(name), entry, |b, entry| {
            b.iter(|| sanitize_archive_path(black_box(entry), black_box(dest)));
        });
    }

    group.finish();
}

fn bench_tag_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_valid_tag_name");

    group.bench_function("semver", |b| {
        b.iter(|| is_valid_tag_name(black_box("v1.2.3-beta.4+build.5")));
    });
    group.bench_function("invalid", |b| {
        b.iter(|| is_valid_tag_name(black_box("v1..2 ~x")));
    });

    group.finish();
}

/// Ordering decides which tag `latest` points at.
fn bench_sort_versions(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_newest_first");

    for size in [10usize, 100, 1000] {
        let versions: Vec<String> = (0..size)
            .map(|i| format!("{}.{}.{}", i % 7, (i * 31) % 13, i))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &versions, |b, versions| {
            b.iter_batched(
                || versions.iter().cloned().map(DottedVersion::boxed).collect::<Vec<_>>(),
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

fn build_tarball(files: usize) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for i in 0..files {
        let contents = format!("export const value{i} = {i};\n");
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder
            .append_data(&mut header, format!("package/src/file{i}.js"), contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_tar_gz");

    for files in [10usize, 100] {
        let data = build_tarball(files);
        group.bench_with_input(BenchmarkId::from_parameter(files), &data, |b, data| {
            b.iter_batched(
                || tempfile::TempDir::new().unwrap(),
                |dir| {
                    extract_tar_gz(black_box(data), dir.path(), 1, "pkg@1.0.0").unwrap();
                    dir
                },
                criterion::BatchSize::PerIteration,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sanitize,
    bench_tag_validation,
    bench_sort_versions,
    bench_extract
);
criterion_main!(benches);
