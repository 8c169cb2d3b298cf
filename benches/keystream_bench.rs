use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orbicfg::checksum::{completion_checksum, validate};
use orbicfg::cipher::apply_keystream;
use orbicfg::header::MAX_HEADER_AND_CONFIG_SIZE;
use orbicfg::rng::{MuslRand, RandomData};

fn bench_seed(c: &mut Criterion) {
    c.bench_function("random_r_seed_type3", |b| b.iter(|| RandomData::seed(black_box(0x2013_1224))));
}

fn bench_keystream(c: &mut Criterion) {
    let data = vec![0u8; MAX_HEADER_AND_CONFIG_SIZE - 12];

    c.bench_function("uclibc_xor_full_buffer", |b| {
        b.iter(|| {
            let mut buf = data.clone();
            apply_keystream(black_box(&mut buf), &mut RandomData::seed(0x2013_1224));
        })
    });

    c.bench_function("musl_xor_full_buffer", |b| {
        b.iter(|| {
            let mut buf = data.clone();
            apply_keystream(black_box(&mut buf), &mut MuslRand::seed(0x2013_1224));
        })
    });
}

fn bench_checksum(c: &mut Criterion) {
    let data = vec![0x5au8; MAX_HEADER_AND_CONFIG_SIZE - 12];
    let crc = completion_checksum(&data);
    c.bench_function("checksum_full_buffer", |b| b.iter(|| validate(black_box(&data), crc)));
}

criterion_group!(benches, bench_seed, bench_keystream, bench_checksum);
criterion_main!(benches);
