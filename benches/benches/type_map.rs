// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_type_map`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hashbrown::HashMap;
use understory_type_map::{BoundedKeyMap, TypeMap, TypeRegistry};

const DENSE_LEN: usize = 256;

fn filled(keys: impl Iterator<Item = u32>) -> BoundedKeyMap<u32, u64> {
    let mut map = BoundedKeyMap::new(DENSE_LEN);
    for key in keys {
        map.insert(key, u64::from(key));
    }
    map
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_map/get");

    let dense = filled(0..200);
    group.bench_function("dense_hit", |b| {
        b.iter(|| black_box(dense.get(black_box(137))))
    });
    group.bench_function("dense_miss", |b| {
        b.iter(|| black_box(dense.get(black_box(250))))
    });

    let overflow = filled((0..200).map(|i| 10_000 + i));
    group.bench_function("overflow_hit", |b| {
        b.iter(|| black_box(overflow.get(black_box(10_137))))
    });

    let baseline: HashMap<u32, u64> = (0..200).map(|k| (k, u64::from(k))).collect();
    group.bench_function("hashbrown_baseline", |b| {
        b.iter(|| black_box(baseline.get(&black_box(137))))
    });

    group.finish();
}

fn bench_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_map/clear");

    for active in [4_u32, 64, 256] {
        group.bench_with_input(BenchmarkId::new("sparse", active), &active, |b, &active| {
            b.iter_batched(
                || filled((0..active).map(|i| i * 3 % 1024)),
                |mut map| {
                    map.clear();
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_type_registry(c: &mut Criterion) {
    struct Visual;
    struct Control;
    struct Slider;

    let mut registry = TypeRegistry::new();
    registry.register::<Visual>();
    let control = registry.register_derived::<Control>(registry.key_of::<Visual>().unwrap());
    let slider = registry.register_derived::<Slider>(control);

    let mut cache: TypeMap<&'static str> = TypeMap::for_types();
    cache.insert(slider, "SliderStyle");

    let mut group = c.benchmark_group("type_map/registry");
    group.bench_function("key_of", |b| {
        b.iter(|| black_box(registry.key_of::<Slider>()))
    });
    group.bench_function("cached_metadata", |b| {
        b.iter(|| black_box(cache.get(black_box(slider))))
    });
    group.bench_function("is_derived_from", |b| {
        let visual = registry.key_of::<Visual>().unwrap();
        b.iter(|| black_box(registry.is_derived_from(black_box(slider), visual)))
    });
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_clear, bench_type_registry);
criterion_main!(benches);
