use gfec_core::EcError;
use gfec_math::{invert_matrix, GfMatrix, GfSymbol};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, n: usize) -> GfMatrix {
    let bytes: Vec<u8> = (0..n * n).map(|_| rng.gen()).collect();
    GfMatrix::from_bytes(n, n, bytes).unwrap()
}

#[test]
fn test_inverse_times_matrix_is_identity() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut inverted = 0;
    for n in 1..=12 {
        for _ in 0..20 {
            let a = random_matrix(&mut rng, n);
            match invert_matrix(&a) {
                Ok(inv) => {
                    assert!(a.mul(&inv).unwrap().is_identity(), "A * A^-1 != I for n={n}");
                    assert!(inv.mul(&a).unwrap().is_identity(), "A^-1 * A != I for n={n}");
                    inverted += 1;
                }
                Err(e) => assert!(e.is_singular(), "unexpected error {e}"),
            }
        }
    }
    // Random matrices over GF(256) are invertible with probability ~0.996.
    assert!(inverted > 200);
}

#[test]
fn test_input_is_not_modified() {
    let a = GfMatrix::from_rows(&[[0u8, 3, 5], [7, 0, 1], [2, 9, 0]]).unwrap();
    let before = a.clone();
    let _ = invert_matrix(&a);
    assert_eq!(a, before);
}

#[test]
fn test_zero_row_is_singular() {
    let a = GfMatrix::from_rows(&[[1u8, 2, 3], [0, 0, 0], [4, 5, 6]]).unwrap();
    let err = invert_matrix(&a).unwrap_err();
    assert!(matches!(err, EcError::SingularMatrix { .. }));
    assert!(!a.is_invertible());
}

#[test]
fn test_duplicate_rows_are_singular() {
    let a = GfMatrix::from_rows(&[[9u8, 8, 7], [1, 2, 3], [9, 8, 7]]).unwrap();
    assert!(invert_matrix(&a).unwrap_err().is_singular());
}

#[test]
fn test_dependent_rows_are_singular() {
    // row2 = 3 * row0 + row1
    let r0 = [0x11u8, 0x22, 0x33];
    let r1 = [0x04u8, 0x05, 0x06];
    let r2: Vec<u8> = r0
        .iter()
        .zip(&r1)
        .map(|(&x, &y)| (GfSymbol(3) * GfSymbol(x) + GfSymbol(y)).0)
        .collect();
    let a = GfMatrix::from_rows(&[r0.to_vec(), r1.to_vec(), r2]).unwrap();
    assert!(invert_matrix(&a).unwrap_err().is_singular());
}

#[test]
fn test_identity_inverts_to_itself() {
    for n in 1..8 {
        let i = GfMatrix::identity(n);
        assert_eq!(invert_matrix(&i).unwrap(), i);
    }
}

#[test]
fn test_double_inversion_round_trips() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let a = random_matrix(&mut rng, 6);
        if let Ok(inv) = a.invert() {
            assert_eq!(inv.invert().unwrap(), a);
        }
    }
}
