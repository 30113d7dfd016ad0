//! Fixed regression vectors
//!
//! Exact expected results for small alphabets, shared by every decomposer.

use mass_decomposer::{
    ClassicalDpMassDecomposer, DecomposerOptions, IntegerMassDecomposer, RealMassDecomposer,
    Weights,
};

fn sorted(mut decompositions: Vec<Vec<u64>>) -> Vec<Vec<u64>> {
    decompositions.sort();
    decompositions
}

#[test]
fn test_partitions_of_six_after_gcd_reduction() {
    let weights = Weights::from_integer_weights(vec![3, 6, 9]).unwrap();
    let options = DecomposerOptions::default().with_gcd_reduction(true);
    let expected = vec![
        vec![0, 0, 2],
        vec![0, 3, 0],
        vec![1, 1, 1],
        vec![2, 2, 0],
        vec![3, 0, 1],
        vec![4, 1, 0],
        vec![6, 0, 0],
    ];

    let mut integer = IntegerMassDecomposer::with_options(&weights, options).unwrap();
    assert_eq!(integer.weights(), &[1, 2, 3]);
    assert_eq!(sorted(integer.get_all_decompositions(6).unwrap()), expected);
    assert_eq!(integer.get_number_of_decompositions(6).unwrap(), 7);

    let mut classical = ClassicalDpMassDecomposer::with_options(&weights, options).unwrap();
    assert_eq!(sorted(classical.get_all_decompositions(6).unwrap()), expected);
    assert_eq!(classical.get_number_of_decompositions(6).unwrap(), 7);
}

#[test]
fn test_scaled_alphabet_mass_44() {
    let weights = Weights::new(&[0.6, 0.7, 1.1, 1.5], 0.1).unwrap();
    assert_eq!(weights.weights(), &[6, 7, 11, 15]);
    let expected = vec![
        vec![0, 0, 4, 0],
        vec![0, 1, 2, 1],
        vec![0, 2, 0, 2],
        vec![2, 3, 1, 0],
        vec![3, 0, 1, 1],
        vec![5, 2, 0, 0],
    ];

    let mut integer = IntegerMassDecomposer::new(&weights).unwrap();
    assert_eq!(sorted(integer.get_all_decompositions(44).unwrap()), expected);
    assert_eq!(integer.get_number_of_decompositions(44).unwrap(), 6);

    let mut classical = ClassicalDpMassDecomposer::new(&weights).unwrap();
    assert_eq!(sorted(classical.get_all_decompositions(44).unwrap()), expected);
}

#[test]
fn test_zero_mass_always_decomposable() {
    for alphabet in [vec![1], vec![7, 3], vec![6, 10, 15], vec![1000, 1001, 999]] {
        let integer = IntegerMassDecomposer::from_weights(&alphabet).unwrap();
        let mut classical = ClassicalDpMassDecomposer::from_weights(&alphabet).unwrap();
        assert!(integer.exist(0).unwrap());
        assert!(classical.exist(0).unwrap());
        assert_eq!(integer.get_all_decompositions(0).unwrap(), vec![vec![0; alphabet.len()]]);
    }
}

#[test]
fn test_below_smallest_weight_never_decomposable() {
    for alphabet in [vec![7, 3], vec![6, 10, 15], vec![1000, 1001, 999]] {
        let smallest = *alphabet.iter().min().unwrap();
        let integer = IntegerMassDecomposer::from_weights(&alphabet).unwrap();
        let mut classical = ClassicalDpMassDecomposer::from_weights(&alphabet).unwrap();
        for mass in 1..smallest {
            assert!(!integer.exist(mass).unwrap(), "{:?} mass {}", alphabet, mass);
            assert!(!classical.exist(mass).unwrap(), "{:?} mass {}", alphabet, mass);
        }
    }
}

#[test]
fn test_zero_error_real_equals_integer() {
    // Exactly representable masses at unit precision
    let weights = Weights::new(&[6.0, 7.0, 11.0, 15.0], 1.0).unwrap();
    let real = RealMassDecomposer::new(&weights).unwrap();
    let integer = IntegerMassDecomposer::new(&weights).unwrap();

    for mass in [6u64, 13, 29, 44, 100] {
        assert_eq!(
            sorted(real.get_decompositions(mass as f64, 0.0).unwrap()),
            sorted(integer.get_all_decompositions(mass).unwrap()),
            "mass {}",
            mass
        );
    }
    assert_eq!(real.get_number_of_decompositions(44.0, 0.0).unwrap(), 6);
}
