use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cloud_count::{Sky, count_sky, find_clouds};

fn striped_sky(side: usize) -> Sky {
    let cells = (0..side * side)
        .map(|i| if (i / side + i % side) % 3 == 0 { 9 } else { 2 })
        .collect();
    Sky::from_flat(side, side, cells).unwrap()
}

fn bench_count(c: &mut Criterion) {
    let sky = striped_sky(512);
    c.bench_function("count_sky 512x512 striped", |b| {
        b.iter(|| black_box(count_sky(black_box(&sky))));
    });

    let solid = Sky::from_flat(512, 512, vec![0; 512 * 512]).unwrap();
    c.bench_function("count_sky 512x512 solid", |b| {
        b.iter(|| black_box(count_sky(black_box(&solid))));
    });
}

fn bench_find(c: &mut Criterion) {
    let sky = striped_sky(256);
    c.bench_function("find_clouds 256x256 striped", |b| {
        b.iter(|| black_box(find_clouds(black_box(&sky))));
    });
}

criterion_group!(benches, bench_count, bench_find);
criterion_main!(benches);
