//! Mass decomposition benchmarks
//!
//! Residue table construction, integer enumeration, and the real mass scan
//! (sequential and rayon) over the CHNOPS alphabet.
//!
//! ## Usage
//!
//! ```powershell
//! cargo bench --bench decomposer_bench
//! ```

use std::hint::black_box;
use std::sync::OnceLock;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mass_decomposer::{
    CombinedWeightDecomposer, IntegerMassDecomposer, RealMassDecomposer, SimultaneousDecomposer,
    TwoListDecomposer, Weights, build_residue_table,
};

/// C, H, N, O, P, S monoisotopic masses
const CHNOPS: [f64; 6] = [12.0, 1.007825, 14.003074, 15.994915, 30.973762, 31.972071];

fn decomposer_criterion() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5))
}

/// Cached weights at the default precision
static WEIGHTS: OnceLock<Weights> = OnceLock::new();

fn get_weights() -> &'static Weights {
    WEIGHTS.get_or_init(|| {
        let mut masses = CHNOPS.to_vec();
        masses.sort_by(f64::total_cmp);
        Weights::with_default_precision(&masses).expect("valid alphabet")
    })
}

// =============================================================================
// Residue Table
// =============================================================================

fn bench_residue_table(c: &mut Criterion) {
    let weights = get_weights();
    let mut group = c.benchmark_group("residue_table");

    group.bench_function("build_chnops", |b| {
        b.iter(|| black_box(build_residue_table(black_box(weights.weights())).unwrap()))
    });

    group.finish();
}

// =============================================================================
// Integer Decomposition
// =============================================================================

fn bench_integer(c: &mut Criterion) {
    let decomposer = IntegerMassDecomposer::from_weights(&[2, 3, 5, 7, 11]).unwrap();
    let mut group = c.benchmark_group("integer");

    for mass in [100u64, 200, 400] {
        group.bench_with_input(BenchmarkId::new("all_decompositions", mass), &mass, |b, &m| {
            b.iter(|| black_box(decomposer.get_all_decompositions(m).unwrap()))
        });
    }

    group.bench_function("exist_range", |b| {
        b.iter(|| (0..10_000u64).filter(|&m| decomposer.exist(m).unwrap()).count())
    });

    group.finish();
}

// =============================================================================
// Real Mass Scan
// =============================================================================

fn bench_real(c: &mut Criterion) {
    let decomposer = RealMassDecomposer::new(get_weights()).unwrap();
    let mut group = c.benchmark_group("real");

    for mass in [200.0, 400.0] {
        group.bench_with_input(BenchmarkId::new("sequential", mass), &mass, |b, &m| {
            b.iter(|| black_box(decomposer.get_decompositions(m, 0.005).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("parallel", mass), &mass, |b, &m| {
            b.iter(|| black_box(decomposer.get_decompositions_parallel(m, 0.005).unwrap()))
        });
    }

    group.finish();
}

// =============================================================================
// Two Weight Sets
// =============================================================================

fn bench_two_mass(c: &mut Criterion) {
    let nominal = Weights::from_integer_weights(vec![1, 12, 14, 16]).unwrap();
    let mono = Weights::from_integer_weights(vec![1008, 12000, 14003, 15995]).unwrap();
    let two_list = TwoListDecomposer::new(&nominal, &mono).unwrap();
    let combined = CombinedWeightDecomposer::new(&nominal, &mono).unwrap();
    let mut group = c.benchmark_group("two_mass");

    // C6H12O6
    group.bench_function("two_list", |b| {
        b.iter(|| black_box(two_list.get_all_decompositions(180, 180_066).unwrap()))
    });
    group.bench_function("combined", |b| {
        b.iter(|| black_box(combined.get_all_decompositions(180, 180_066).unwrap()))
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = decomposer_criterion();
    targets = bench_residue_table, bench_integer, bench_real, bench_two_mass,
}

criterion_main!(benches);
