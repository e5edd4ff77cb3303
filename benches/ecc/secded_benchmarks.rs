use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hamming_secded::{hamming11, hamming4, hamming57};

pub fn benchmark_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");

    group.bench_function(BenchmarkId::new("hamming4", 0b101), |b| {
        b.iter(|| hamming4::pack_masked(black_box(0b101), black_box(true)))
    });
    group.bench_function(BenchmarkId::new("hamming11", 0x2a5), |b| {
        b.iter(|| hamming11::pack_masked(black_box(0x2a5), black_box(true)))
    });
    group.bench_function(BenchmarkId::new("hamming57", 0xdead_beef_u32), |b| {
        b.iter(|| hamming57::pack_masked(black_box(0xdead_beef), black_box(false)))
    });

    group.finish();
}

pub fn benchmark_correct(c: &mut Criterion) {
    let mut group = c.benchmark_group("correct");

    let word = hamming57::pack_masked(0x00ab_cdef_0123_4567, true);
    for (name, damaged) in [
        ("clean", word),
        ("single", word ^ (1 << 40)),
        ("double", word ^ (1 << 40) ^ (1 << 5)),
    ] {
        group.bench_with_input(BenchmarkId::new("hamming57", name), &damaged, |b, &w| {
            b.iter(|| hamming57::correct(black_box(w)))
        });
    }

    let word = hamming4::pack_masked(0b101, true);
    group.bench_with_input(BenchmarkId::new("hamming4", "single"), &(word ^ 0x40), |b, &w| {
        b.iter(|| hamming4::correct(black_box(w)))
    });

    let word = hamming11::pack_masked(0x2a5, false);
    group.bench_with_input(BenchmarkId::new("hamming11", "single"), &(word ^ 1), |b, &w| {
        b.iter(|| hamming11::correct(black_box(w)))
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = benchmark_pack, benchmark_correct
}
criterion_main!(benches);
