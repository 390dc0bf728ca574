//! Criterion micro-benchmarks for particle record encoding and decoding.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use mote_bench::{encoded_population, population};
use mote_particle::{read_particles, write_particles};
use mote_pool::PropertyPool;

/// Benchmark: encode 10K particles with 6 properties each.
fn bench_encode_10k(c: &mut Criterion) {
    let pool = PropertyPool::new(6);
    let particles = population(&pool, 10_000);

    c.bench_function("codec_encode_10k", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            write_particles(&particles, &mut buf).unwrap();
            black_box(&buf);
        });
    });
}

/// Benchmark: decode 10K particles into a fresh pool.
fn bench_decode_10k(c: &mut Criterion) {
    let encoded = encoded_population(10_000, 6);

    c.bench_function("codec_decode_10k", |b| {
        b.iter(|| {
            let pool = PropertyPool::new(6);
            let mut cursor = encoded.as_slice();
            let particles = read_particles::<3, 3>(&mut cursor, Some(&pool)).unwrap();
            black_box(particles.len());
        });
    });
}

/// Benchmark: migrate 10K particles between two pools in place.
fn bench_migrate_10k(c: &mut Criterion) {
    let a = PropertyPool::new(6);
    let b_pool = PropertyPool::new(6);
    let mut particles = population(&a, 10_000);
    let mut to_b = true;

    c.bench_function("particle_migrate_10k", |b| {
        b.iter(|| {
            let target = if to_b { &b_pool } else { &a };
            for p in &mut particles {
                p.set_property_pool(target).unwrap();
            }
            to_b = !to_b;
            black_box(particles.len());
        });
    });
}

criterion_group!(benches, bench_encode_10k, bench_decode_10k, bench_migrate_10k);
criterion_main!(benches);
