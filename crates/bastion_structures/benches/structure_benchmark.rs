//! Benchmark for structure generation.
//!
//! TARGET: a medium mineshaft or a default village well under a millisecond
//!
//! Run with: cargo bench --package bastion_structures --bench structure_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use bastion_structures::{BlockDescriptor, Coordinate, StructureGenerator, StructureKind, StructureOptions};

fn benchmark_each_kind(c: &mut Criterion) {
    let engine = StructureGenerator::with_seed(42);
    let options = StructureOptions::new();
    let mut group = c.benchmark_group("generate");

    for kind in StructureKind::ALL {
        group.bench_function(kind.id(), |b| {
            let mut x = 0;
            b.iter(|| {
                x += 256;
                let mut writes = 0_u64;
                let mut writer = |_: Coordinate, _: BlockDescriptor| writes += 1;
                let result = engine.generate(kind.id(), Coordinate::new(x, 40, 0), &options, &mut writer);
                black_box((result, writes))
            });
        });
    }

    group.finish();
}

fn benchmark_village_sizes(c: &mut Criterion) {
    let engine = StructureGenerator::with_seed(7);
    let mut group = c.benchmark_group("village_size");
    group.sample_size(20);

    for size in [5_i64, 13, 25] {
        let options = StructureOptions::new().with_village_size(size);
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(0)));
        group.bench_function(format!("{size}_buildings"), |b| {
            b.iter(|| {
                let mut sink = |_: Coordinate, block: BlockDescriptor| {
                    black_box(block);
                };
                black_box(engine.generate("village", Coordinate::new(0, 64, 0), &options, &mut sink))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_each_kind, benchmark_village_sizes);
criterion_main!(benches);
