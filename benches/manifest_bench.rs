use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use git_owl::exclude::ExclusionBlock;
use git_owl::manifest::{Manifest, PathFilter};
use std::hint::black_box;
use std::path::Path;

fn manifest_text(entries: usize) -> String {
    let mut text = String::with_capacity(entries * 64);
    for i in 0..entries {
        text.push_str(&format!("{:040x}  data/set_{:03}/file_{i}.bin\n", i, i % 100));
    }
    text
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifest_parse");
    for size in [100, 1_000, 10_000] {
        let text = manifest_text(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| Manifest::parse_persisted(black_box(text), Path::new(".gitowl")).unwrap());
        });
    }
    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let left = Manifest::parse_persisted(&manifest_text(5_000), Path::new(".gitowl")).unwrap();
    let right = Manifest::parse_persisted(&manifest_text(10_000), Path::new(".gitowl")).unwrap();
    let filter = PathFilter::new("data/set_0*/*").unwrap();

    c.bench_function("manifest_merge_unfiltered", |b| {
        b.iter(|| {
            let mut merged = left.clone();
            merged.merge(black_box(&right), None);
            merged
        });
    });

    c.bench_function("manifest_merge_glob", |b| {
        b.iter(|| {
            let mut merged = Manifest::new();
            merged.merge(black_box(&right), Some(&filter));
            merged
        });
    });
}

fn benchmark_serialize(c: &mut Criterion) {
    let manifest = Manifest::parse_persisted(&manifest_text(10_000), Path::new(".gitowl")).unwrap();
    let exclusions = ExclusionBlock::parse("target/\n*.log\n");

    c.bench_function("manifest_serialize", |b| {
        b.iter(|| black_box(&manifest).serialize().unwrap());
    });

    c.bench_function("exclusion_render", |b| {
        b.iter(|| exclusions.render(black_box(&manifest).paths()));
    });
}

criterion_group!(benches, benchmark_parse, benchmark_merge, benchmark_serialize);
criterion_main!(benches);
