use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

use models::item::{now, Item};
use models::mapper::{from_fields, to_fields};

fn bench_mapper(c: &mut Criterion) {
    let item = Item::new(
        "0b7c7e52-5a4e-4a53-9a5a-0e7a3c1d2f10",
        "bench-item",
        "a description long enough to look like real data",
        now(),
    );
    let stored: HashMap<String, String> = to_fields(&item).into_iter().collect();

    c.bench_function("item_to_fields", |b| {
        b.iter(|| to_fields(black_box(&item)));
    });

    c.bench_function("item_from_fields", |b| {
        b.iter(|| from_fields(black_box(&stored)));
    });
}

criterion_group!(benches, bench_mapper);
criterion_main!(benches);
