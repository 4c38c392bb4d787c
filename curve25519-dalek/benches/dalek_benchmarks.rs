//! Scalar and point arithmetic benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::field::FieldElement;
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::scalar_mul;

fn test_scalar() -> Scalar {
    Scalar::from_bytes_mod_order(&[
        0x1a, 0x0e, 0x97, 0x8a, 0x90, 0xf6, 0x62, 0x2d, 0x37, 0x47, 0x02, 0x3f, 0x8a, 0xd8, 0x26,
        0x4d, 0xa7, 0x58, 0xaa, 0x1b, 0x88, 0xe0, 0x40, 0xd1, 0x58, 0x9e, 0x7b, 0x7f, 0x23, 0x76,
        0xef, 0x09,
    ])
}

fn field_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");
    let a = FieldElement::ONE;
    let b = test_scalar().to_bytes();
    let b = FieldElement::from_bytes(&b);

    group.bench_function("mul", |bench| bench.iter(|| black_box(a).mul(&black_box(b))));
    group.bench_function("square", |bench| bench.iter(|| black_box(b).square()));
    group.bench_function("invert", |bench| bench.iter(|| black_box(b).invert()));
    group.finish();
}

fn scalar_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar");
    let a = test_scalar();
    let b = Scalar::ONE;

    group.bench_function("mul", |bench| bench.iter(|| black_box(a).mul(&black_box(b))));
    group.bench_function("mul_add", |bench| {
        bench.iter(|| black_box(a).mul_add(&black_box(b), &black_box(a)))
    });
    group.finish();
}

fn edwards_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("edwards");
    let b = EdwardsPoint::basepoint();
    let s = test_scalar();

    group.bench_function("double", |bench| bench.iter(|| black_box(b).double()));
    group.bench_function("add", |bench| bench.iter(|| black_box(b).add(&black_box(b))));
    group.bench_function("scalar_mul", |bench| {
        bench.iter(|| scalar_mul::multiply(&black_box(b), &black_box(s)))
    });
    group.bench_function("compress", |bench| bench.iter(|| black_box(b).compress()));
    group.finish();
}

fn montgomery_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("montgomery");
    let u = MontgomeryPoint::basepoint();
    let scalar_bytes = test_scalar().to_bytes();

    group.bench_function("mul_clamped", |bench| {
        bench.iter(|| black_box(u).mul_clamped(black_box(scalar_bytes)))
    });
    group.finish();
}

fn ristretto_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("ristretto");
    let p = RistrettoPoint::basepoint();
    let s = test_scalar();

    group.bench_function("scalar_mul", |bench| {
        bench.iter(|| black_box(p).mul(&black_box(s)))
    });
    group.bench_function("compress", |bench| bench.iter(|| black_box(p).compress()));
    group.finish();
}

#[cfg(feature = "rand_core")]
fn signing_key_generation(c: &mut Criterion) {
    use curve25519_dalek::signing::SigningKey;
    use rand_core::OsRng;

    c.bench_function("signing_key_generate", |bench| {
        bench.iter(|| SigningKey::generate(&mut OsRng))
    });
}

#[cfg(feature = "rand_core")]
criterion_group!(
    benches,
    field_arithmetic,
    scalar_arithmetic,
    edwards_arithmetic,
    montgomery_arithmetic,
    ristretto_arithmetic,
    signing_key_generation,
);
#[cfg(not(feature = "rand_core"))]
criterion_group!(
    benches,
    field_arithmetic,
    scalar_arithmetic,
    edwards_arithmetic,
    montgomery_arithmetic,
    ristretto_arithmetic,
);
criterion_main!(benches);
